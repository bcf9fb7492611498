//! crates/simlog/src/macros.rs
//! Call-site macros implementing the check-then-construct pattern.
//!
//! Each macro takes `format!`-style arguments, optionally preceded by
//! `category: <expr>,` where the expression is anything that is
//! `AsRef<str>`. Info-tier macros first ask [`enabled`](crate::enabled)
//! whether the category's threshold admits the call site's verbosity and
//! skip formatting entirely when it does not.
//!
//! | macro            | severity | verbosity |
//! |------------------|----------|-----------|
//! | [`sim_traceall!`] | info     | `DEBUG`   |
//! | [`sim_trace!`]    | info     | `FULL`    |
//! | [`sim_debug!`]    | info     | `HIGH`    |
//! | [`sim_info!`]     | info     | `MEDIUM`  |
//! | [`sim_warn!`]     | warning  | `MEDIUM`  |
//! | [`sim_error!`]    | error    | `MEDIUM`  |
//! | [`sim_fatal!`]    | fatal    | `MEDIUM`  |

#[doc(hidden)]
#[macro_export]
macro_rules! __sim_log {
    (@emit $tier:ty, $verbosity:expr, $category:expr, $($arg:tt)+) => {{
        let category: ::std::option::Option<&str> = $category;
        let verbosity: $crate::Verbosity = $verbosity;
        if $crate::enabled::<$tier>(category, verbosity) {
            let mut logger =
                $crate::ScopedLogger::<$tier>::new(::std::file!(), ::std::line!(), verbosity);
            logger.set_category(category);
            let _ = ::std::fmt::Write::write_fmt(&mut logger, ::std::format_args!($($arg)+));
        }
    }};
    ($tier:ty, $verbosity:expr, category = $category:expr; $($arg:tt)+) => {{
        let category = &$category;
        $crate::__sim_log!(
            @emit $tier,
            $verbosity,
            ::std::option::Option::Some(::std::convert::AsRef::<str>::as_ref(category)),
            $($arg)+
        )
    }};
    ($tier:ty, $verbosity:expr; $($arg:tt)+) => {
        $crate::__sim_log!(@emit $tier, $verbosity, ::std::option::Option::None, $($arg)+)
    };
}

/// Reports an info-tier message at [`Verbosity::DEBUG`](crate::Verbosity::DEBUG).
///
/// # Example
/// ```ignore
/// sim_traceall!(category: "top.bus", "beat {} of {}", beat, total);
/// ```
#[macro_export]
macro_rules! sim_traceall {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::DEBUG, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::DEBUG; $($arg)+)
    };
}

/// Reports an info-tier message at [`Verbosity::FULL`](crate::Verbosity::FULL).
#[macro_export]
macro_rules! sim_trace {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::FULL, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::FULL; $($arg)+)
    };
}

/// Reports an info-tier message at [`Verbosity::HIGH`](crate::Verbosity::HIGH).
#[macro_export]
macro_rules! sim_debug {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::HIGH, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::HIGH; $($arg)+)
    };
}

/// Reports an info-tier message at [`Verbosity::MEDIUM`](crate::Verbosity::MEDIUM).
///
/// # Example
/// ```ignore
/// sim_info!("loaded {} bytes", image.len());
/// sim_info!(category: name, "reset released");
/// ```
#[macro_export]
macro_rules! sim_info {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::MEDIUM, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Info, $crate::Verbosity::MEDIUM; $($arg)+)
    };
}

/// Reports a warning. Never filtered at the call site.
#[macro_export]
macro_rules! sim_warn {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Warning, $crate::Verbosity::MEDIUM, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Warning, $crate::Verbosity::MEDIUM; $($arg)+)
    };
}

/// Reports an error. Never filtered at the call site.
#[macro_export]
macro_rules! sim_error {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Error, $crate::Verbosity::MEDIUM, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Error, $crate::Verbosity::MEDIUM; $($arg)+)
    };
}

/// Reports a fatal error. Stopping the process is left to the sink.
#[macro_export]
macro_rules! sim_fatal {
    (category: $category:expr, $($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Fatal, $crate::Verbosity::MEDIUM, category = $category; $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sim_log!($crate::tier::Fatal, $crate::Verbosity::MEDIUM; $($arg)+)
    };
}

/// Reports a fatal record when `cond` is false in builds with debug
/// assertions enabled.
///
/// An optional `format!`-style message is appended after the condition text.
#[macro_export]
macro_rules! sim_assert {
    ($cond:expr $(,)?) => {
        if ::std::cfg!(debug_assertions) && !$cond {
            $crate::sim_fatal!("assertion failed: {}", ::std::stringify!($cond));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if ::std::cfg!(debug_assertions) && !$cond {
            $crate::sim_fatal!(
                "assertion failed: {}: {}",
                ::std::stringify!($cond),
                ::std::format_args!($($arg)+)
            );
        }
    };
}
