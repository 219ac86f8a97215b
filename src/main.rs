use std::process::ExitCode;

use leicat::{cli::CliApp, core::SQLError, util::SimpleLogger, Catalog, Session};
use log::{error, info, LevelFilter};

static LOGGER: SimpleLogger = SimpleLogger;

pub fn main() -> ExitCode {
    if log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Info))
        .is_err()
    {
        eprintln!("logger already initialized");
    }

    let paths = std::env::args().skip(1).collect::<Vec<_>>();
    let session = Session::new(Catalog::new());

    let result = if paths.is_empty() {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        CliApp::new(session, stdin.lock(), stdout.lock()).run()
    } else {
        build_from_files(session, &paths)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Apply each file in order and print the resulting catalog.
fn build_from_files(mut session: Session, paths: &[String]) -> Result<(), SQLError> {
    for path in paths {
        info!("Loading {}", path);
        let sql_text = std::fs::read_to_string(path)?;
        session.execute(&sql_text).map_err(|e| {
            SQLError::new(e.kind, format!("{}: {}", path, e.message))
        })?;
    }

    print!("{}", session.catalog());
    Ok(())
}
