//! Tree command implementation

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use qti_marshal::{MarshalOptions, Marshaller};
use qti_model::{Component, ComponentKind};

use super::Input;

/// Execute the tree command
pub fn execute(path: &Path, options: MarshalOptions) -> Result<()> {
    let input = Input::read(path)?;
    let component = input
        .load(&Marshaller::new(options), None)
        .map_err(|diagnostic| input.fail(&diagnostic))?;
    print!("{}", render_tree(&component));
    Ok(())
}

/// One line per component, indented by depth.
pub fn render_tree(root: &Component) -> String {
    let mut out = String::new();
    for (depth, component) in root.walk() {
        let indent = "  ".repeat(depth);
        if component.kind == ComponentKind::TextRun {
            let _ = writeln!(out, "{}{:?}", indent, component.text.as_deref().unwrap_or(""));
            continue;
        }
        let _ = write!(out, "{}{}", indent, component.kind);
        for (name, value) in component.attributes.iter() {
            let _ = write!(out, " {}=\"{}\"", name, value);
        }
        if let Some(text) = component.text.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(out, " {:?}", text);
        }
        if let Some(blob) = &component.blob {
            let _ = write!(out, " [blob: {} bytes]", blob.len());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let component = Marshaller::default()
            .unmarshal_str(
                r#"<and>
                     <variable identifier="A"/>
                     <baseValue baseType="integer">1</baseValue>
                     <customOperator class="x.Y"><cfg/></customOperator>
                   </and>"#,
            )
            .unwrap();
        insta::assert_snapshot!(render_tree(&component), @r#"
        and
          variable identifier="A"
          baseValue baseType="integer" "1"
          customOperator class="x.Y" [blob: 6 bytes]
        "#);
    }

    #[test]
    fn test_render_text_runs() {
        let component = Marshaller::default()
            .unmarshal_str("<p>Hi <em>there</em></p>")
            .unwrap();
        insta::assert_snapshot!(render_tree(&component), @r#"
        p
          "Hi "
          em
            "there"
        "#);
    }
}
