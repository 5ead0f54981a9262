/*!
 * Gettext catalog handling.
 *
 * - `line`: classification of physical catalog lines
 * - `accumulator`: reconstruction of multi-line source text
 * - `rewriter`: the streaming rewrite state machine
 */

pub use self::accumulator::SourceAccumulator;
pub use self::line::{classify, LineKind};
pub use self::rewriter::{escape, CatalogRewriter, RewriteOptions, RewriteStats};

pub mod accumulator;
pub mod line;
pub mod rewriter;
