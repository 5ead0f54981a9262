/*!
 * Tests for the streaming catalog rewriter
 */

use babelfill::catalog::{CatalogRewriter, RewriteOptions, RewriteStats};
use babelfill::errors::CatalogError;
use crate::common::mocks::MockTranslator;
use crate::common::SAMPLE_CATALOG;

async fn rewrite_text(
    translator: &MockTranslator,
    language: &str,
    input: &str,
    options: RewriteOptions,
) -> Result<(String, RewriteStats), CatalogError> {
    let mut output = Vec::new();
    let stats = CatalogRewriter::new(translator, language, options)
        .rewrite(input.as_bytes(), &mut output)
        .await?;
    Ok((String::from_utf8(output).unwrap(), stats))
}

#[tokio::test]
async fn test_rewrite_withEmptySourceBlock_shouldTranslateAndDropFuzzy() {
    let translator = MockTranslator::new().with_entry("fr", "Hello world", "Bonjour le monde");
    let input = "msgid \"\"\n\"Hello world\"\nmsgstr \"\"\n#, fuzzy\n";

    let (output, stats) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(output, "msgid \"\"\n\"Hello world\"\nmsgstr \"Bonjour le monde\"\n");
    assert_eq!(
        stats,
        RewriteStats {
            lines_read: 4,
            entries_translated: 1,
            fuzzy_removed: 1,
        }
    );
}

#[tokio::test]
async fn test_rewrite_withUnrecognisedLines_shouldCopyThemVerbatim() {
    let translator = MockTranslator::new();
    let input = "# Translator comment\n\n#: app/models.py:3\n#~ msgid \"obsolete\"\nmsgctxt \"menu\"\n   \t \n";

    let (output, stats) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(output, input);
    assert_eq!(stats.entries_translated, 0);
    assert!(translator.calls().is_empty());
}

#[tokio::test]
async fn test_rewrite_withMultiLineSource_shouldTranslateOncePerBlockWithFullText() {
    let translator = MockTranslator::new();

    let (_, stats) = rewrite_text(&translator, "de", SAMPLE_CATALOG, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(
        translator.translated_texts(),
        vec!["Hello world".to_string(), "Welcome to the dashboard".to_string()]
    );
    // The header block is closed too, with empty source text
    assert_eq!(stats.entries_translated, 3);
    assert!(translator.calls().iter().all(|(_, language)| language == "de"));
}

#[tokio::test]
async fn test_rewrite_withHeaderEntry_shouldKeepHeaderIntact() {
    let translator = MockTranslator::new();

    let (output, _) = rewrite_text(&translator, "fr", SAMPLE_CATALOG, RewriteOptions::default())
        .await
        .unwrap();

    assert!(output.starts_with(
        "# French translations for demo.\nmsgid \"\"\nmsgstr \"\"\n\"Project-Id-Version: demo 1.0\\n\"\n"
    ));
    assert!(output.contains("msgid \"Hello world\"\nmsgstr \"[fr] Hello world\"\n"));
    assert!(output.ends_with("\"Welcome to \"\n\"the dashboard\"\nmsgstr \"[fr] Welcome to the dashboard\"\n"));
}

#[tokio::test]
async fn test_rewrite_withFuzzyRemovalDisabled_shouldPreserveMarkers() {
    let translator = MockTranslator::new();
    let options = RewriteOptions { remove_fuzzy: false };

    let (output, stats) = rewrite_text(&translator, "fr", SAMPLE_CATALOG, options).await.unwrap();

    let count = |text: &str| text.lines().filter(|line| *line == "#, fuzzy").count();
    assert_eq!(count(&output), count(SAMPLE_CATALOG));
    assert_eq!(stats.fuzzy_removed, 0);
}

#[tokio::test]
async fn test_rewrite_withFuzzyRemovalEnabled_shouldDropEveryMarker() {
    let translator = MockTranslator::new();
    let input = "#, fuzzy\nmsgid \"A\"\nmsgstr \"\"\n\n#, fuzzy\nmsgid \"B\"\nmsgstr \"\"\n";

    let (output, stats) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert!(!output.lines().any(|line| line == "#, fuzzy"));
    assert_eq!(stats.fuzzy_removed, 2);
    assert_eq!(output, "msgid \"A\"\nmsgstr \"[fr] A\"\n\nmsgid \"B\"\nmsgstr \"[fr] B\"\n");
}

#[tokio::test]
async fn test_rewrite_withEscapedQuotes_shouldUnescapeSourceAndEscapeTranslation() {
    let translator = MockTranslator::new().with_entry("fr", "Say \"hi\"", "Dis \"salut\"");
    let input = "msgid \"Say \\\"hi\\\"\"\nmsgstr \"\"\n";

    let (output, _) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(translator.translated_texts(), vec!["Say \"hi\"".to_string()]);
    assert_eq!(output, "msgid \"Say \\\"hi\\\"\"\nmsgstr \"Dis \\\"salut\\\"\"\n");
}

#[tokio::test]
async fn test_rewrite_withNewlineEscapes_shouldCarryThemThroughTranslation() {
    let translator = MockTranslator::new();
    let input = "msgid \"Usage:\\n  run\\n\"\nmsgstr \"\"\n";

    let (output, _) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(translator.translated_texts(), vec!["Usage:\\n  run\\n".to_string()]);
    assert_eq!(output, "msgid \"Usage:\\n  run\\n\"\nmsgstr \"[fr] Usage:\\n  run\\n\"\n");
}

#[tokio::test]
async fn test_rewrite_withUnclosedPluralEntry_shouldStillCopyLines() {
    let translator = MockTranslator::new();
    let input = "msgid \"Apple\"\nmsgid_plural \"Apples\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n\nmsgid \"Pear\"\nmsgstr \"\"\n";

    let (output, stats) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert!(output.starts_with("msgid \"Apple\"\nmsgid_plural \"Apples\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n\nmsgid \"Pear\"\n"));
    assert_eq!(stats.entries_translated, 1);
    assert_eq!(stats.lines_read, 7);
}

#[tokio::test]
async fn test_rewrite_withCrlfCatalog_shouldKeepLineTerminators() {
    let translator = MockTranslator::new().with_entry("fr", "Hi", "Salut");
    let input = "# comment\r\nmsgid \"Hi\"\r\nmsgstr \"\"\r\n";

    let (output, _) = rewrite_text(&translator, "fr", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(output, "# comment\r\nmsgid \"Hi\"\r\nmsgstr \"Salut\"\r\n");
}

#[tokio::test]
async fn test_rewrite_withoutFinalNewline_shouldNotAddOne() {
    let translator = MockTranslator::new();
    let input = "msgid \"A\"\nmsgstr \"\"";

    let (output, _) = rewrite_text(&translator, "it", input, RewriteOptions::default())
        .await
        .unwrap();

    assert_eq!(output, "msgid \"A\"\nmsgstr \"[it] A\"");
}

#[tokio::test]
async fn test_rewrite_whenTranslatorFails_shouldReportLineOfEntry() {
    let translator = MockTranslator::new().failing_for("fr");
    let input = "# header\nmsgid \"A\"\nmsgstr \"\"\n";

    let result = rewrite_text(&translator, "fr", input, RewriteOptions::default()).await;

    match result {
        Err(CatalogError::Translation { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a translation error, got {:?}", other.map(|(_, stats)| stats)),
    }
}

#[test]
fn test_rewrite_withBlockingRuntime_shouldWork() {
    let translator = MockTranslator::new().with_entry("es", "Yes", "Sí");
    let (output, _) = tokio_test::block_on(rewrite_text(
        &translator,
        "es",
        "msgid \"Yes\"\nmsgstr \"\"\n",
        RewriteOptions::default(),
    ))
    .unwrap();

    assert_eq!(output, "msgid \"Yes\"\nmsgstr \"Sí\"\n");
}
