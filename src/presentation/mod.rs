mod renderer;
mod text;
mod view;

pub use renderer::FieldRenderer;
pub use text::PlainTextRenderer;
pub use view::{Control, FieldView, SectionView};
