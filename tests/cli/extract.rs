use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const APP: &str = r#"import {html} from 'lit';
import {msg} from '@lit/localize';

// msgdesc: Home page
export const greeting = msg('greeting', html`Hello <b>World</b>`);
export const bye = msg('bye', 'Bye');
"#;

const XLIFF_CONFIG: &str = r#"{
  "sourceLocale": "en",
  "targetLocales": ["es", "de"],
  "interchange": {"format": "xliff", "xliffDir": "xliff"},
  "output": {"mode": "runtime", "outputDir": "src/generated/locales"}
}"#;

#[test]
fn test_extract_xliff() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file("lit-localize.json", XLIFF_CONFIG)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(
        stdout(&output)
            .contains("Extracted 2 messages from 1 source file, wrote 2 interchange files")
    );

    let es = test.read_file("xliff/es.xlf")?;
    assert!(es.contains(r#"<file target-language="es" source-language="en""#));
    assert!(es.contains(
        r#"<source>Hello <x id="0" equiv-text="&lt;b&gt;"/>World<x id="1" equiv-text="&lt;/b&gt;"/></source>"#
    ));
    assert!(es.contains("<note>Home page</note>"));
    assert!(test.root().join("xliff/de.xlf").exists());

    Ok(())
}

#[test]
fn test_extract_xlb_with_explicit_config() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file(
        "config/localize.json",
        r#"{
  "targetLocales": ["es"],
  "inputFiles": ["../src"],
  "interchange": {"format": "xlb", "outputFile": "xlb/en.xlb", "translationsGlob": "xlb/*_*.xlb"}
}"#,
    )?;

    let output = test
        .extract_command()
        .args(["--config", "config/localize.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let xlb = test.read_file("config/xlb/en.xlb")?;
    assert!(xlb.contains(r#"<localizationbundle locale="en">"#));
    assert!(xlb.contains(r#"<msg name="bye">Bye</msg>"#));
    assert!(xlb.contains(r#"<msg name="greeting" desc="Home page">"#));

    Ok(())
}

#[test]
fn test_extract_invalid_call_aborts() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "import {msg} from '@lit/localize';\nconst id = 'x';\nmsg(id, 'Hello');\n",
    )?;
    test.write_file("lit-localize.json", XLIFF_CONFIG)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("error:"));
    assert!(out.contains("invalid-msg-call"));
    assert!(out.contains("--> src/app.ts:3:5"));
    assert!(out.contains("Aborted, no files were written"));
    assert!(!test.root().join("xliff").exists());

    Ok(())
}

#[test]
fn test_extract_conflicting_duplicate() -> Result<()> {
    let test = CliTest::with_file(
        "src/a.ts",
        "import {msg} from '@lit/localize';\nmsg('x', 'One');\n",
    )?;
    test.write_file(
        "src/b.ts",
        "import {msg} from '@lit/localize';\nmsg('x', 'Two');\n",
    )?;
    test.write_file("lit-localize.json", XLIFF_CONFIG)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("duplicate-message"));
    assert!(out.contains("first defined at src/a.ts:2:1"));

    Ok(())
}

#[test]
fn test_extract_invalid_config_is_internal_error() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file(
        "lit-localize.json",
        r#"{"sourceLocale": "en", "targetLocales": ["es", "es"]}"#,
    )?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Error:"));
    assert!(err.contains("Duplicate locale \"es\""));

    Ok(())
}
