//! Direct key-to-field binding, without manual event handling.
//!
//! A [`FieldSink`] maps recognized key names to pre-registered typed slots:
//! each slot is a `&mut` reference to a value implementing [`BindValue`].
//! Registration is explicit and ordered; there is no reflection. Items whose
//! section does not match the optional filter, or whose key is not
//! registered, are forwarded to an optional fallback sink, so consumers
//! compose into chains.
//!
//! # Examples
//!
//! ```
//! use confedit::{FieldSink, Section, parse_bytes};
//!
//! let mut bare = false;
//! let mut compression = 0_i64;
//! let mut sink = FieldSink::for_section(Section::new("core"))
//!     .bind("bare", &mut bare)
//!     .bind("compression", &mut compression);
//!
//! parse_bytes(
//!     &mut sink,
//!     "config",
//!     b"[core]\n\tbare = true\n\tcompression = 9\n",
//! )
//! .unwrap();
//! drop(sink);
//! assert!(bare);
//! assert_eq!(compression, 9);
//! ```

use core::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::{
    error::SinkError,
    parser::{Item, Sink},
    section::Section,
};

/// A typed slot a [`FieldSink`] can fill from an item's textual value.
pub trait BindValue {
    /// Reset to the zero state; used for a bare key with no `=`.
    fn clear(&mut self);

    /// Parse `text` into the slot.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError::BadValue`] for malformed input, which the
    /// parser reports at the value's start position.
    fn assign(&mut self, text: &BStr) -> Result<(), SinkError>;
}

impl BindValue for BString {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn assign(&mut self, text: &BStr) -> Result<(), SinkError> {
        *self = BString::from(text);
        Ok(())
    }
}

impl BindValue for String {
    fn clear(&mut self) {
        String::clear(self);
    }

    fn assign(&mut self, text: &BStr) -> Result<(), SinkError> {
        match text.to_str() {
            Ok(s) => {
                *self = s.to_string();
                Ok(())
            }
            Err(_) => Err(SinkError::BadValue(format!("invalid UTF-8 in {text:?}"))),
        }
    }
}

macro_rules! impl_bind_value_from_str {
    ($($t:ty),+ $(,)?) => {
        $(
            impl BindValue for $t {
                fn clear(&mut self) {
                    *self = <$t>::default();
                }

                fn assign(&mut self, text: &BStr) -> Result<(), SinkError> {
                    let parsed = text
                        .to_str()
                        .ok()
                        .and_then(|s| s.parse::<$t>().ok())
                        .ok_or_else(|| {
                            SinkError::BadValue(format!(
                                concat!("invalid ", stringify!($t), " value {:?}"),
                                text
                            ))
                        })?;
                    *self = parsed;
                    Ok(())
                }
            }
        )+
    };
}

impl_bind_value_from_str!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// A [`Sink`] that fills registered typed slots from matching items.
#[derive(Default)]
pub struct FieldSink<'a> {
    section: Option<Section>,
    fields: Vec<(String, &'a mut dyn BindValue)>,
    next: Option<&'a mut dyn Sink>,
}

impl<'a> FieldSink<'a> {
    /// A sink with no section filter: items from every section are matched
    /// against the registered keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that only binds items belonging to `section`.
    #[must_use]
    pub fn for_section(section: Section) -> Self {
        Self {
            section: Some(section),
            ..Self::default()
        }
    }

    /// Register a slot for `name`. Later registrations of the same name
    /// shadow nothing: the first match wins.
    #[must_use]
    pub fn bind(mut self, name: &str, slot: &'a mut dyn BindValue) -> Self {
        self.fields.push((name.to_string(), slot));
        self
    }

    /// Forward unrecognized keys and non-matching sections to `next`.
    #[must_use]
    pub fn chain(mut self, next: &'a mut dyn Sink) -> Self {
        self.next = Some(next);
        self
    }
}

impl fmt::Debug for FieldSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSink")
            .field("section", &self.section)
            .field(
                "fields",
                &self.fields.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("chained", &self.next.is_some())
            .finish()
    }
}

impl Sink for FieldSink<'_> {
    fn item(&mut self, item: Item<'_>) -> Result<(), SinkError> {
        let matches = match (&self.section, item.section) {
            (None, _) => true,
            (Some(want), Some(got)) => want == got,
            (Some(_), None) => false,
        };
        if matches {
            if let Some((_, slot)) = self.fields.iter_mut().find(|(name, _)| name == item.key) {
                return match &item.value {
                    Some(value) => slot.assign(value.as_bstr()),
                    None => {
                        slot.clear();
                        Ok(())
                    }
                };
            }
        }
        match &mut self.next {
            Some(next) => next.item(item),
            None => Ok(()),
        }
    }
}
