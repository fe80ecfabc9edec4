use super::view::{FieldView, SectionView};

/// Boundary between the form engine and whatever draws it.
///
/// The engine only hands out [`FieldView`]s for fields that should be shown;
/// suppressed fields never reach a renderer.
pub trait FieldRenderer {
    type Output;

    fn render_field(&mut self, field: &FieldView<'_>) -> Self::Output;

    fn render_section(&mut self, section: &SectionView<'_>) -> Vec<Self::Output> {
        section
            .fields
            .iter()
            .map(|field| self.render_field(field))
            .collect()
    }
}
