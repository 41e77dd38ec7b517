use std::io::Write;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::MatsimWriterError;

const INDENT_SIZE: usize = 2;

/// streaming, indented XML writer that tracks the currently open elements. elements
/// still open when the writer is dropped are closed so an interrupted document is
/// at least well-formed up to the point of failure.
pub struct XmlDocumentWriter<W: Write> {
    writer: Option<Writer<W>>,
    open_elements: Vec<String>,
}

impl<W: Write> XmlDocumentWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Some(Writer::new_with_indent(inner, b' ', INDENT_SIZE)),
            open_elements: vec![],
        }
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>` followed by `<!DOCTYPE {doctype}>`
    pub fn write_prologue(&mut self, doctype: &str) -> Result<(), MatsimWriterError> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_event(Event::DocType(BytesText::from_escaped(doctype)))
    }

    /// opens an element, which stays open until the matching [Self::end]
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), MatsimWriterError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write_event(Event::Start(element))?;
        self.open_elements.push(name.to_string());
        Ok(())
    }

    /// writes a self-closing element
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), MatsimWriterError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write_event(Event::Empty(element))
    }

    /// writes `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), MatsimWriterError> {
        self.write_event(Event::Start(BytesStart::new(name)))?;
        self.write_event(Event::Text(BytesText::new(text)))?;
        self.write_event(Event::End(BytesEnd::new(name)))
    }

    /// closes the most recently opened element
    pub fn end(&mut self) -> Result<(), MatsimWriterError> {
        let name = self.open_elements.pop().ok_or_else(|| {
            MatsimWriterError::InternalError(String::from("no open XML element to close"))
        })?;
        self.write_event(Event::End(BytesEnd::new(name)))
    }

    /// closes the document and hands back the underlying sink. fails when elements
    /// are still open.
    pub fn finish(mut self) -> Result<W, MatsimWriterError> {
        if let Some(open) = self.open_elements.last() {
            return Err(MatsimWriterError::InternalError(format!(
                "XML element '{open}' was never closed"
            )));
        }
        let mut writer = self.writer.take().ok_or_else(|| {
            MatsimWriterError::InternalError(String::from("XML writer already finished"))
        })?;
        writer
            .get_mut()
            .write_all(b"\n")
            .map_err(|e| MatsimWriterError::XmlWriteError(e.to_string()))?;
        Ok(writer.into_inner())
    }

    fn write_event(&mut self, event: Event<'_>) -> Result<(), MatsimWriterError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            MatsimWriterError::InternalError(String::from("XML writer already finished"))
        })?;
        writer
            .write_event(event)
            .map_err(|e| MatsimWriterError::XmlWriteError(e.to_string()))
    }
}

impl<W: Write> Drop for XmlDocumentWriter<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            while let Some(name) = self.open_elements.pop() {
                if let Err(e) = writer.write_event(Event::End(BytesEnd::new(name))) {
                    log::warn!("unable to close XML element while aborting document: {e}");
                    break;
                }
            }
            let _ = writer.get_mut().flush();
        }
    }
}
