use std::io;
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the stderr subscriber.
///
/// `JDG_LOG` takes an `EnvFilter` directive string, e.g.
/// `JDG_LOG=jdg_tax_core::projection=debug`. Without it only warnings are
/// shown, or everything from this tool and the core at debug level when
/// `verbose` is set.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "jdg=debug,jdg_tax_core=debug"
        } else {
            "warn"
        };
        let filter =
            EnvFilter::try_from_env("JDG_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
