//! Logging macros.
//!
//! Every macro captures the caller's function, file and line at the call site.
//! Without a `logger:` argument records go to the process-wide logger started
//! with [`start`](crate::start); with one they go to that handle directly.

/// Capture the [`Callsite`](crate::Callsite) of the macro invocation
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::Callsite::new(
            $crate::__function_path!(),
            ::std::file!(),
            ::std::line!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __holmes_marker() {}
        fn __holmes_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __holmes_type_name_of(__holmes_marker);
        name.strip_suffix("::__holmes_marker").unwrap_or(name)
    }};
}

/// Log a formatted message at the given level
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, $crate::callsite!(), ::std::format_args!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::registry::log($level, $crate::callsite!(), ::std::format_args!($($arg)+))
    };
}

/// Log the operands' `Display` output concatenated with no separator
#[macro_export]
macro_rules! logln {
    (logger: $logger:expr, $level:expr, $($arg:expr),+ $(,)?) => {
        $logger.log(
            $level,
            $crate::callsite!(),
            ::std::format_args!(
                "{}",
                $crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+])
            ),
        )
    };
    ($level:expr, $($arg:expr),+ $(,)?) => {
        $crate::registry::log(
            $level,
            $crate::callsite!(),
            ::std::format_args!(
                "{}",
                $crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+])
            ),
        )
    };
}

#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at FATAL and exit the process with status 1
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Fatal, $($arg)+)
    };
}

#[macro_export]
macro_rules! debugln {
    (logger: $logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::logln!(logger: $logger, $crate::LogLevel::Debug, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::logln!($crate::LogLevel::Debug, $($arg),+)
    };
}

#[macro_export]
macro_rules! infoln {
    (logger: $logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::logln!(logger: $logger, $crate::LogLevel::Info, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::logln!($crate::LogLevel::Info, $($arg),+)
    };
}

#[macro_export]
macro_rules! warnln {
    (logger: $logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::logln!(logger: $logger, $crate::LogLevel::Warn, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::logln!($crate::LogLevel::Warn, $($arg),+)
    };
}

#[macro_export]
macro_rules! errorln {
    (logger: $logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::logln!(logger: $logger, $crate::LogLevel::Error, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::logln!($crate::LogLevel::Error, $($arg),+)
    };
}

#[macro_export]
macro_rules! fatalln {
    (logger: $logger:expr, $($arg:expr),+ $(,)?) => {
        $crate::logln!(logger: $logger, $crate::LogLevel::Fatal, $($arg),+)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::logln!($crate::LogLevel::Fatal, $($arg),+)
    };
}
