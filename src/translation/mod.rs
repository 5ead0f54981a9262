/*!
 * Translation of catalog source texts.
 *
 * - `core`: the `Translator` seam and the provider-backed `TranslationService`
 */

pub use self::core::{Translator, TranslationService};

pub mod core;
