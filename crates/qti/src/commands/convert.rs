//! Convert command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use qti_marshal::{MarshalOptions, Marshaller, Profile};
use tracing::info;

use super::Input;

/// Arguments for the convert command
#[derive(Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,
    /// Output profile, overriding the configured one
    pub to: Option<Profile>,
    /// Input profile, instead of detecting it
    pub from: Option<Profile>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs, mut options: MarshalOptions) -> Result<()> {
    if let Some(to) = args.to {
        options.profile = to;
    }
    if args.pretty && options.indent.is_none() {
        options.indent = Some(2);
    }

    let input = Input::read(&args.input)?;
    let marshaller = Marshaller::new(options);
    let output = convert(&input, &marshaller, args.from)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, output + "\n")
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(
                "Converted {} to {} ({})",
                input.path.display(),
                path.display(),
                marshaller.options().profile
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn convert(input: &Input, marshaller: &Marshaller, from: Option<Profile>) -> Result<String> {
    let component = input
        .load(marshaller, from)
        .map_err(|diagnostic| input.fail(&diagnostic))?;
    marshaller
        .marshal_to_string(&component)
        .map_err(|err| input.fail(&err.to_diagnostic()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_convert_to_qti3() {
        let input = Input::from_source(
            Path::new("and.xml"),
            r#"<and><variable identifier="A"/><null/></and>"#.to_string(),
        );
        let marshaller = Marshaller::new(MarshalOptions {
            profile: Profile::Qti3,
            xml_declaration: false,
            ..MarshalOptions::default()
        });
        insta::assert_snapshot!(
            convert(&input, &marshaller, None).unwrap(),
            @r#"<qti-and><qti-variable identifier="A"/><qti-null/></qti-and>"#
        );
    }

    #[test]
    fn test_convert_failure() {
        let input = Input::from_source(Path::new("bad.xml"), "<and/>".to_string());
        let err = convert(&input, &Marshaller::default(), None).unwrap_err();
        assert_eq!(err.to_string(), "Failed to convert bad.xml");
    }
}
