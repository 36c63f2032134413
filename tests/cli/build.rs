use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const APP: &str = r#"import {html} from 'lit';
import {msg} from '@lit/localize';

export const greeting = msg('greeting', html`Hello <b>World</b>`);
export const welcome = (name: string) => msg('welcome', (name: string) => `Welcome ${name}!`, name);
"#;

const ES_XLIFF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
<file target-language="es" source-language="en" original="lit-localize-inputs" datatype="plaintext">
<body>
<trans-unit id="greeting">
  <source>Hello <x id="0" equiv-text="&lt;b&gt;"/>World<x id="1" equiv-text="&lt;/b&gt;"/></source>
  <target>Hola <x id="0" equiv-text="&lt;b&gt;"/>Mundo<x id="1" equiv-text="&lt;/b&gt;"/></target>
</trans-unit>
<trans-unit id="welcome">
  <source>Welcome <x id="0" equiv-text="${name}"/>!</source>
  <target>¡Bienvenido <x id="0" equiv-text="${name}"/>!</target>
</trans-unit>
</body>
</file>
</xliff>
"#;

fn config(output: &str) -> String {
    format!(
        r#"{{
  "sourceLocale": "en",
  "targetLocales": ["es"],
  "interchange": {{"format": "xliff", "xliffDir": "xliff"}},
  "output": {output}
}}"#
    )
}

#[test]
fn test_build_runtime() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file("xliff/es.xlf", ES_XLIFF)?;
    test.write_file(
        "lit-localize.json",
        &config(
            r#"{"mode": "runtime", "outputDir": "src/generated/locales", "localeCodesModule": "src/generated/locale-codes.ts"}"#,
        ),
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Built 2 messages for 1 locale (runtime mode), wrote 2 files"));

    let es = test.read_file("src/generated/locales/es.ts")?;
    assert!(es.starts_with("// Do not modify this file by hand!"));
    assert!(es.contains("  'greeting': html`Hola <b>Mundo</b>`,"));
    assert!(es.contains("  'welcome': (name) => `¡Bienvenido ${name}!`,"));

    let codes = test.read_file("src/generated/locale-codes.ts")?;
    assert!(codes.contains("export const targetLocales = [\n  'es',\n] as const;"));

    Ok(())
}

#[test]
fn test_build_transform() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file("xliff/es.xlf", ES_XLIFF)?;
    test.write_file(
        "lit-localize.json",
        &config(r#"{"mode": "transform", "outputDir": "build"}"#),
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let es = test.read_file("build/es/src/app.ts")?;
    assert!(!es.contains("@lit/localize"));
    assert!(es.contains("html`Hola <b>Mundo</b>`"));
    assert!(es.contains("`¡Bienvenido ${name}!`"));

    Ok(())
}

#[test]
fn test_build_placeholder_mismatch_aborts() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file(
        "xliff/es.xlf",
        &ES_XLIFF.replace(
            r#"Mundo<x id="1" equiv-text="&lt;/b&gt;"/></target>"#,
            "Mundo</target>",
        ),
    )?;
    test.write_file(
        "lit-localize.json",
        &config(r#"{"mode": "runtime", "outputDir": "src/generated/locales"}"#),
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("placeholder-mismatch"));
    assert!(out.contains("Aborted, no files were written"));
    assert!(!test.root().join("src/generated").exists());

    Ok(())
}

#[test]
fn test_build_missing_translations_warn() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file(
        "lit-localize.json",
        &config(r#"{"mode": "runtime", "outputDir": "src/generated/locales"}"#),
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("warning:"));
    assert!(out.contains("missing-translation"));
    assert!(out.contains("2 problems (0 errors, 2 warnings)"));

    let es = test.read_file("src/generated/locales/es.ts")?;
    assert!(es.contains("  'greeting': html`Hello <b>World</b>`,"));

    Ok(())
}

#[test]
fn test_build_malformed_interchange_is_internal_error() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", APP)?;
    test.write_file("xliff/es.xlf", "<xliff><file><body/></file></xliff>")?;
    test.write_file(
        "lit-localize.json",
        &config(r#"{"mode": "runtime", "outputDir": "src/generated/locales"}"#),
    )?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("es.xlf"));
    assert!(err.contains("target-language"));

    Ok(())
}
