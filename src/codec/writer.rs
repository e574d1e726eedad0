use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::CodecError;
use crate::config::Config;
use crate::model::{
    Category, Common, Entry, Extension, Feed, Generator, Link, Person, Text, ATOM_NAMESPACE,
};

/// Renders the Atom model as quick-xml events.
///
/// Unset optional fields are omitted; required fields (`id`, `title`,
/// `updated`, person `name`) are always written, empty or not.
pub(crate) struct AtomWriter<W: Write> {
    writer: Writer<W>,
    declaration: bool,
}

impl<W: Write> AtomWriter<W> {
    pub(crate) fn new(inner: W, config: &Config) -> Self {
        let writer = if config.indent == 0 {
            Writer::new(inner)
        } else {
            Writer::new_with_indent(inner, b' ', config.indent)
        };
        Self {
            writer,
            declaration: config.write_declaration,
        }
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn declaration(&mut self) -> Result<(), CodecError> {
        if self.declaration {
            self.writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        Ok(())
    }

    pub(crate) fn write_feed_document(&mut self, feed: &Feed) -> Result<(), CodecError> {
        self.declaration()?;
        self.write_feed("feed", feed, true)
    }

    pub(crate) fn write_entry_document(&mut self, entry: &Entry) -> Result<(), CodecError> {
        self.declaration()?;
        self.write_entry(entry, true)
    }

    /// Writes `feed` as `<feed>`, or as `<source>` for an entry's source.
    fn write_feed(&mut self, tag: &str, feed: &Feed, root: bool) -> Result<(), CodecError> {
        let mut start = BytesStart::new(tag);
        if root {
            start.push_attribute(("xmlns", ATOM_NAMESPACE));
        }
        push_namespaces(&mut start, &feed.namespaces);
        push_common(&mut start, &feed.common);
        self.writer.write_event(Event::Start(start))?;

        for author in &feed.authors {
            self.write_person("author", author)?;
        }
        for category in &feed.categories {
            self.write_category(category)?;
        }
        for contributor in &feed.contributors {
            self.write_person("contributor", contributor)?;
        }
        if let Some(generator) = &feed.generator {
            self.write_generator(generator)?;
        }
        self.optional_element("icon", &feed.icon)?;
        self.text_element("id", &feed.id)?;
        for link in &feed.links {
            self.write_link(link)?;
        }
        self.optional_element("logo", &feed.logo)?;
        self.optional_element("rights", &feed.rights)?;
        self.optional_element("subtitle", &feed.subtitle)?;
        self.text_element("title", &feed.title)?;
        self.text_element("updated", feed.updated.as_str())?;

        for entry in &feed.entries {
            self.write_entry(entry, false)?;
        }
        for extension in &feed.extensions {
            self.write_extension(extension)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn write_entry(&mut self, entry: &Entry, root: bool) -> Result<(), CodecError> {
        let mut start = BytesStart::new("entry");
        if root {
            start.push_attribute(("xmlns", ATOM_NAMESPACE));
        }
        push_namespaces(&mut start, &entry.namespaces);
        push_common(&mut start, &entry.common);
        self.writer.write_event(Event::Start(start))?;

        for author in &entry.authors {
            self.write_person("author", author)?;
        }
        for category in &entry.categories {
            self.write_category(category)?;
        }
        if let Some(content) = &entry.content {
            self.write_text("content", content)?;
        }
        for contributor in &entry.contributors {
            self.write_person("contributor", contributor)?;
        }
        self.text_element("id", &entry.id)?;
        for link in &entry.links {
            self.write_link(link)?;
        }
        if let Some(published) = &entry.published {
            self.text_element("published", published.as_str())?;
        }
        self.optional_element("rights", &entry.rights)?;
        if let Some(source) = &entry.source {
            self.write_feed("source", &source.feed, false)?;
        }
        if let Some(summary) = &entry.summary {
            self.write_text("summary", summary)?;
        }
        self.text_element("title", &entry.title)?;
        self.text_element("updated", entry.updated.as_str())?;

        for extension in &entry.extensions {
            self.write_extension(extension)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new("entry")))?;
        Ok(())
    }

    fn write_person(&mut self, tag: &str, person: &Person) -> Result<(), CodecError> {
        let mut start = BytesStart::new(tag);
        push_common(&mut start, &person.common);
        self.writer.write_event(Event::Start(start))?;

        self.text_element("name", &person.name)?;
        self.optional_element("uri", &person.uri)?;
        self.optional_element("email", &person.email)?;
        for extension in &person.extensions {
            self.write_extension(extension)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn write_category(&mut self, category: &Category) -> Result<(), CodecError> {
        let mut start = BytesStart::new("category");
        push_common(&mut start, &category.common);
        start.push_attribute(("term", category.term.as_str()));
        push_optional(&mut start, "scheme", &category.scheme);
        push_optional(&mut start, "label", &category.label);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn write_generator(&mut self, generator: &Generator) -> Result<(), CodecError> {
        let mut start = BytesStart::new("generator");
        push_common(&mut start, &generator.common);
        push_optional(&mut start, "uri", &generator.uri);
        push_optional(&mut start, "version", &generator.version);
        self.element(start, BytesText::new(&generator.text))
    }

    fn write_link(&mut self, link: &Link) -> Result<(), CodecError> {
        let mut start = BytesStart::new("link");
        push_common(&mut start, &link.common);
        start.push_attribute(("href", link.href.as_str()));
        push_optional(&mut start, "rel", &link.rel);
        push_optional(&mut start, "type", &link.media_type);
        push_optional(&mut start, "hreflang", &link.hreflang);
        push_optional(&mut start, "title", &link.title);
        push_optional(&mut start, "length", &link.length);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn write_text(&mut self, tag: &str, text: &Text) -> Result<(), CodecError> {
        let mut start = BytesStart::new(tag);
        push_common(&mut start, &text.common);
        push_optional(&mut start, "type", &text.text_type);
        push_optional(&mut start, "src", &text.src);
        self.element(start, BytesText::from_escaped(text.body.as_str()))
    }

    fn write_extension(&mut self, extension: &Extension) -> Result<(), CodecError> {
        let mut start = BytesStart::new(extension.name.as_str());
        for (key, value) in &extension.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        self.element(start, BytesText::from_escaped(extension.xml.as_str()))
    }

    fn text_element(&mut self, tag: &str, value: &str) -> Result<(), CodecError> {
        self.element(BytesStart::new(tag), BytesText::new(value))
    }

    fn optional_element(&mut self, tag: &str, value: &Option<String>) -> Result<(), CodecError> {
        match value {
            Some(value) => self.text_element(tag, value),
            None => Ok(()),
        }
    }

    /// Writes `<tag>text</tag>` on one line, or `<tag/>` when `text` is empty.
    fn element(&mut self, start: BytesStart<'_>, text: BytesText<'_>) -> Result<(), CodecError> {
        if text.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        let end = start.to_end().into_owned();
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(text))?;
        self.writer.write_event(Event::End(end))?;
        Ok(())
    }
}

fn push_common(start: &mut BytesStart<'_>, common: &Common) {
    push_optional(start, "xml:base", &common.base);
    push_optional(start, "xml:lang", &common.lang);
}

fn push_namespaces(start: &mut BytesStart<'_>, namespaces: &[(String, String)]) {
    for (key, value) in namespaces {
        start.push_attribute((key.as_str(), value.as_str()));
    }
}

fn push_optional(start: &mut BytesStart<'_>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        start.push_attribute((key, value.as_str()));
    }
}
