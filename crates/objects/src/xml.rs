use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Thin helpers over the quick-xml event writer so the object model reads as
/// structure, not event plumbing.

pub fn start<W: Write>(writer: &mut Writer<W>, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

pub fn end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Self-closing `<tag attrs/>`.
pub fn empty<W: Write>(writer: &mut Writer<W>, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// `<tag attrs>text</tag>` in one call; text is escaped by the writer.
pub fn leaf<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    start(writer, tag, attrs)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, tag)
}
