/*!
 * Streaming catalog rewriter.
 *
 * The rewriter reads a catalog line by line, translates every `msgid` block
 * that is closed by an empty `msgstr ""` placeholder and writes everything
 * else back byte for byte. File rewrites go through a temporary file in the
 * catalog's directory that replaces the original with a single rename, so an
 * interrupted run never leaves a half-written catalog behind.
 */

use std::path::Path;

use log::{debug, trace, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use super::accumulator::SourceAccumulator;
use super::line::{classify, has_entry_keyword, split_terminator, LineKind};
use crate::errors::CatalogError;
use crate::translation::Translator;

/// Options controlling a rewrite
#[derive(Debug, Clone, Copy)]
pub struct RewriteOptions {
    /// Drop `#, fuzzy` lines outside of `msgid` blocks
    pub remove_fuzzy: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self { remove_fuzzy: true }
    }
}

/// Counters collected while rewriting one catalog
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RewriteStats {
    /// Physical lines read from the input
    pub lines_read: usize,
    /// `msgstr ""` placeholders replaced by a translation
    pub entries_translated: usize,
    /// `#, fuzzy` lines dropped
    pub fuzzy_removed: usize,
}

/// Quote-escape a translation for a `msgstr` line
pub fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Rewrites catalogs for one target language
pub struct CatalogRewriter<'a> {
    translator: &'a dyn Translator,
    language: &'a str,
    options: RewriteOptions,
}

impl<'a> CatalogRewriter<'a> {
    pub fn new(translator: &'a dyn Translator, language: &'a str, options: RewriteOptions) -> Self {
        Self {
            translator,
            language,
            options,
        }
    }

    /// Rewrite a catalog stream into `writer`
    ///
    /// Stops at the first failed translation; whatever was written before
    /// that point must be discarded by the caller.
    pub async fn rewrite<R, W>(&self, mut reader: R, writer: &mut W) -> Result<RewriteStats, CatalogError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = RewriteStats::default();
        let mut accumulator = SourceAccumulator::new();
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                break;
            }
            stats.lines_read += 1;

            match classify(&line, accumulator.is_collecting()) {
                LineKind::StartOfTarget if accumulator.is_collecting() => {
                    let source = accumulator.finish();
                    trace!("Translating entry closed at line {}: {:?}", stats.lines_read, source);

                    let translated = self
                        .translator
                        .translate(&source, self.language)
                        .await
                        .map_err(|source| CatalogError::Translation {
                            line: stats.lines_read,
                            source,
                        })?;

                    let (_, terminator) = split_terminator(&line);
                    let replacement = format!("msgstr \"{}\"{}", escape(&translated), terminator);
                    writer.write_all(replacement.as_bytes()).await?;
                    stats.entries_translated += 1;
                }
                LineKind::Continuation => {
                    if has_entry_keyword(&line) {
                        warn!(
                            "[{}] Line {} is folded into an unclosed msgid block: {:?}",
                            self.language,
                            stats.lines_read,
                            split_terminator(&line).0
                        );
                    }
                    accumulator.push_continuation(&line);
                    writer.write_all(line.as_bytes()).await?;
                }
                LineKind::StartOfSource => {
                    accumulator.start(&line);
                    writer.write_all(line.as_bytes()).await?;
                }
                LineKind::FuzzyMarker if self.options.remove_fuzzy => {
                    stats.fuzzy_removed += 1;
                }
                _ => {
                    writer.write_all(line.as_bytes()).await?;
                }
            }
        }

        if accumulator.is_collecting() {
            debug!("Catalog ended inside an untranslated msgid block");
        }

        writer.flush().await?;
        Ok(stats)
    }

    /// Rewrite the catalog at `path` in place
    pub async fn rewrite_file(&self, path: &Path) -> Result<RewriteStats, CatalogError> {
        let input = tokio::fs::File::open(path).await?;
        let permissions = input.metadata().await?.permissions();

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".babelfill-")
            .suffix(".po.tmp")
            .tempfile_in(directory)?;

        let mut output = BufWriter::new(tokio::fs::File::from_std(temp.as_file().try_clone()?));
        let stats = self.rewrite(BufReader::new(input), &mut output).await?;

        let output = output.into_inner();
        output.sync_all().await?;
        drop(output);

        tokio::fs::set_permissions(temp.path(), permissions).await?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!(
            "Rewrote {:?}: {} lines, {} entries translated, {} fuzzy markers removed",
            path, stats.lines_read, stats.entries_translated, stats.fuzzy_removed
        );
        Ok(stats)
    }
}
