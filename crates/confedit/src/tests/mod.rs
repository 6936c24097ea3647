mod editing;
mod properties;

use bstr::BString;

use crate::{Item, Section, SectionStart, Sink, SinkError, Span};

/// Records every event a parse delivers, for assertions.
#[derive(Debug, Default)]
pub struct Recorder {
    pub inited: bool,
    pub sections: Vec<Section>,
    pub items: Vec<(BString, Option<BString>)>,
    pub trailing: Option<(usize, usize)>,
}

impl Sink for Recorder {
    fn init(&mut self) {
        self.inited = true;
    }

    fn section(&mut self, sec: SectionStart<'_>) -> Result<(), SinkError> {
        self.sections.push(sec.section);
        Ok(())
    }

    fn item(&mut self, item: Item<'_>) -> Result<(), SinkError> {
        self.items.push((item.qualified_key(), item.value.clone()));
        Ok(())
    }

    fn done(&mut self, trailing: Span<'_>) {
        self.trailing = Some((trailing.prev_end, trailing.end));
    }
}
