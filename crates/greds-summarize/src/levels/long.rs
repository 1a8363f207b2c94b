use greds_core::errors::LibraryResult;
use greds_core::traits::IGenerationProvider;

/// Long: a condensed excerpt that keeps the source's paragraph breaks, so
/// readers scanning a citation see the chunk's own structure.
pub fn generate(
    provider: &dyn IGenerationProvider,
    text: &str,
    max_chars: usize,
) -> LibraryResult<String> {
    let generated = provider.generate(text, max_chars)?;
    Ok(generated.trim().to_string())
}
