//! Tracing subscriber setup.

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed
/// to parse.
///
/// # Panics
///
/// Panics if a subscriber is already installed.
#[allow(clippy::expect_used)]
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "terminal_gateway=info"
                    .parse()
                    .expect("static directive 'terminal_gateway=info' is valid"),
            ),
        )
        .init();
}
