use greds_core::errors::LibraryResult;
use greds_core::traits::IGenerationProvider;

/// Medium: a few sentences flowed into one paragraph.
pub fn generate(
    provider: &dyn IGenerationProvider,
    text: &str,
    max_chars: usize,
) -> LibraryResult<String> {
    let generated = provider.generate(text, max_chars)?;
    Ok(super::collapse_whitespace(&generated))
}
