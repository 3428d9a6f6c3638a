/// Log through a [`Handler`](crate::handler::Handler) and get the delivery
/// result back.
///
/// The call site is captured where the macro is written, so the reported
/// file, line and enclosing function are always the caller's own. Records below the handler's
/// minimum level are dropped and yield `Ok(())`.
///
/// ```no_run
/// use dual_log_sink::{emit, Handler, Level};
///
/// let handler = Handler::new(false)?;
/// emit!(handler, Level::Info, "server started", port = 8080)?;
/// # Ok::<(), dual_log_sink::Error>(())
/// ```
#[macro_export]
macro_rules! emit {
    ($handler:expr, $level:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let handler: &$crate::handler::Handler = &$handler;
        let level: $crate::level::Level = $level;
        if handler.enabled(level) {
            fn __emit_here() {}
            let function = {
                let name = ::std::any::type_name_of_val(&__emit_here);
                name.strip_suffix("::__emit_here").unwrap_or(name)
            };
            let record = $crate::record::Record::new(level, $message)
                $(.with_attr(stringify!($key), $value))*
                .with_location($crate::record::SourceLocation {
                    file: file!(),
                    line: line!(),
                    module_path: Some(module_path!()),
                    function: Some(function),
                });
            handler.handle(&record)
        } else {
            ::core::result::Result::Ok(())
        }
    }};
}
