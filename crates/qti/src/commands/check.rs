//! Check command implementation

use std::path::PathBuf;

use anyhow::Result;
use qti_marshal::{MarshalOptions, Marshaller};
use tracing::debug;

use super::Input;

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub inputs: Vec<PathBuf>,
    /// Print diagnostics as JSON lines on stdout
    pub json: bool,
}

/// Execute the check command
///
/// Every input is checked even after a failure; the command fails if any did.
pub fn execute(args: CheckArgs, options: MarshalOptions) -> Result<()> {
    let marshaller = Marshaller::new(options);
    let mut failed = 0;

    for path in &args.inputs {
        let input = match Input::read(path) {
            Ok(input) => input,
            Err(err) => {
                failed += 1;
                eprintln!("{:#}", err);
                continue;
            }
        };

        match input.load(&marshaller, None) {
            Ok(component) => {
                debug!(
                    file = %path.display(),
                    components = component.walk().count(),
                    "Document converted"
                );
                if !args.json {
                    println!("{}: ok", path.display());
                }
            }
            Err(diagnostic) => {
                failed += 1;
                if args.json {
                    let line = serde_json::json!({
                        "file": path.display().to_string(),
                        "diagnostic": diagnostic.to_json(),
                    });
                    println!("{}", line);
                } else {
                    eprint!("{}", input.render(&diagnostic));
                }
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} documents failed to convert",
            failed,
            args.inputs.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_fail_the_check() {
        let err = execute(
            CheckArgs {
                inputs: vec![PathBuf::from("/nonexistent/item.xml")],
                json: true,
            },
            MarshalOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 documents failed to convert");
    }
}
