use greds_core::errors::LibraryResult;
use greds_core::traits::IGenerationProvider;

/// Short: a single-line essence for result lists and rehydrated context.
/// The provider sees pre-flattened text so line structure cannot leak in.
pub fn generate(
    provider: &dyn IGenerationProvider,
    text: &str,
    max_chars: usize,
) -> LibraryResult<String> {
    let flat = super::collapse_whitespace(text);
    provider.generate(&flat, max_chars)
}
