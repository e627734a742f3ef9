use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match dashboardd::run_server() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "dashboardd: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}
