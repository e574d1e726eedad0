use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::CodecError;
use crate::config::Config;
use crate::model::{
    Category, Common, Entry, Extension, Feed, Generator, Link, Person, Source, Text, TimeStr,
};

type Attributes = Vec<(String, String)>;

/// Root element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Feed(Feed),
    Entry(Entry),
}

/// Pull parser turning quick-xml events into the Atom model.
///
/// Elements are matched on their local name so prefixed documents
/// (`<atom:feed>`) read the same as default-namespace ones.
pub(crate) struct AtomReader<'a> {
    reader: Reader<&'a [u8]>,
    max_depth: usize,
}

impl<'a> AtomReader<'a> {
    pub(crate) fn new(bytes: &'a [u8], config: &Config) -> Self {
        // SEC-002: quick-xml never expands <!ENTITY> declarations; only the
        // five predefined entities and character references are resolved by
        // `unescape()`, custom ones fail with `EscapeError::UnrecognizedEntity`.
        let reader = Reader::from_reader(bytes);
        Self {
            reader,
            max_depth: config.max_depth,
        }
    }

    /// Reads up to and including the root element.
    pub(crate) fn read_document(&mut self) -> Result<Document, CodecError> {
        loop {
            let (start, empty) = match self.reader.read_event()? {
                Event::Start(e) => (e, false),
                Event::Empty(e) => (e, true),
                Event::Eof => return Err(CodecError::MissingRoot),
                _ => continue,
            };

            return match start.local_name().as_ref() {
                b"feed" => Ok(Document::Feed(self.read_feed(&start, empty, 0)?)),
                b"entry" => Ok(Document::Entry(self.read_entry(&start, empty, 0)?)),
                _ => Err(CodecError::UnexpectedRoot(self.name(&start)?)),
            };
        }
    }

    /// Reads the next child event of the current element.
    ///
    /// Returns `None` at the parent's end tag. Text, comments and processing
    /// instructions between child elements are skipped.
    fn next_child(&mut self) -> Result<Option<(BytesStart<'a>, bool)>, CodecError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Some((e, false))),
                Event::Empty(e) => return Ok(Some((e, true))),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn read_feed(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
        depth: usize,
    ) -> Result<Feed, CodecError> {
        let attrs = self.attributes(start)?;
        log_unknown_attributes("feed", &attrs);
        let mut feed = Feed {
            common: common(&attrs),
            namespaces: namespaces(&attrs),
            ..Default::default()
        };
        if empty {
            return Ok(feed);
        }

        while let Some((child, empty)) = self.next_child()? {
            match child.local_name().as_ref() {
                b"author" => feed.authors.push(self.read_person(&child, empty)?),
                b"category" => feed.categories.push(self.read_category(&child, empty)?),
                b"contributor" => feed.contributors.push(self.read_person(&child, empty)?),
                b"generator" => feed.generator = Some(self.read_generator(&child, empty)?),
                b"icon" => feed.icon = Some(self.read_string(empty)?),
                b"id" => feed.id = self.read_string(empty)?,
                b"link" => feed.links.push(self.read_link(&child, empty)?),
                b"logo" => feed.logo = Some(self.read_string(empty)?),
                b"rights" => feed.rights = Some(self.read_string(empty)?),
                b"subtitle" => feed.subtitle = Some(self.read_string(empty)?),
                b"title" => feed.title = self.read_string(empty)?,
                b"updated" => feed.updated = TimeStr::from(self.read_string(empty)?),
                b"entry" => feed.entries.push(self.read_entry(&child, empty, depth)?),
                _ => feed.extensions.push(self.read_extension(&child, empty)?),
            }
        }

        Ok(feed)
    }

    fn read_entry(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
        depth: usize,
    ) -> Result<Entry, CodecError> {
        let attrs = self.attributes(start)?;
        log_unknown_attributes("entry", &attrs);
        let mut entry = Entry {
            common: common(&attrs),
            namespaces: namespaces(&attrs),
            ..Default::default()
        };
        if empty {
            return Ok(entry);
        }

        while let Some((child, empty)) = self.next_child()? {
            match child.local_name().as_ref() {
                b"author" => entry.authors.push(self.read_person(&child, empty)?),
                b"category" => entry.categories.push(self.read_category(&child, empty)?),
                b"content" => entry.content = Some(self.read_text(&child, empty)?),
                b"contributor" => entry.contributors.push(self.read_person(&child, empty)?),
                b"id" => entry.id = self.read_string(empty)?,
                b"link" => entry.links.push(self.read_link(&child, empty)?),
                b"published" => {
                    entry.published = Some(TimeStr::from(self.read_string(empty)?))
                }
                b"rights" => entry.rights = Some(self.read_string(empty)?),
                b"source" => entry.source = Some(self.read_source(&child, empty, depth + 1)?),
                b"summary" => entry.summary = Some(self.read_text(&child, empty)?),
                b"title" => entry.title = self.read_string(empty)?,
                b"updated" => entry.updated = TimeStr::from(self.read_string(empty)?),
                _ => entry.extensions.push(self.read_extension(&child, empty)?),
            }
        }

        Ok(entry)
    }

    /// `<source>` carries feed metadata directly as its children.
    fn read_source(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
        depth: usize,
    ) -> Result<Source, CodecError> {
        // SEC-003: entry → source → feed → entry chains recurse
        if depth > self.max_depth {
            return Err(CodecError::MaxDepthExceeded(self.max_depth));
        }
        let feed = self.read_feed(start, empty, depth)?;
        Ok(Source { feed })
    }

    fn read_person(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<Person, CodecError> {
        let attrs = self.attributes(start)?;
        let mut person = Person {
            common: common(&attrs),
            ..Default::default()
        };
        if empty {
            return Ok(person);
        }

        while let Some((child, empty)) = self.next_child()? {
            match child.local_name().as_ref() {
                b"name" => person.name = self.read_string(empty)?,
                b"uri" => person.uri = Some(self.read_string(empty)?),
                b"email" => person.email = Some(self.read_string(empty)?),
                _ => person.extensions.push(self.read_extension(&child, empty)?),
            }
        }

        Ok(person)
    }

    fn read_category(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
    ) -> Result<Category, CodecError> {
        let attrs = self.attributes(start)?;
        self.skip_children(start, empty)?;
        Ok(Category {
            common: common(&attrs),
            term: attribute(&attrs, "term").unwrap_or_default(),
            scheme: attribute(&attrs, "scheme"),
            label: attribute(&attrs, "label"),
        })
    }

    fn read_generator(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
    ) -> Result<Generator, CodecError> {
        let attrs = self.attributes(start)?;
        Ok(Generator {
            common: common(&attrs),
            uri: attribute(&attrs, "uri"),
            version: attribute(&attrs, "version"),
            text: self.read_string(empty)?,
        })
    }

    fn read_link(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<Link, CodecError> {
        let attrs = self.attributes(start)?;
        self.skip_children(start, empty)?;
        Ok(Link {
            common: common(&attrs),
            href: attribute(&attrs, "href").unwrap_or_default(),
            rel: attribute(&attrs, "rel"),
            media_type: attribute(&attrs, "type"),
            hreflang: attribute(&attrs, "hreflang"),
            title: attribute(&attrs, "title"),
            length: attribute(&attrs, "length"),
        })
    }

    /// Text constructs keep their inner markup verbatim.
    fn read_text(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<Text, CodecError> {
        let attrs = self.attributes(start)?;
        Ok(Text {
            common: common(&attrs),
            text_type: attribute(&attrs, "type"),
            src: attribute(&attrs, "src"),
            body: self.read_raw(start, empty)?,
        })
    }

    fn read_extension(
        &mut self,
        start: &BytesStart<'a>,
        empty: bool,
    ) -> Result<Extension, CodecError> {
        Ok(Extension {
            name: self.name(start)?,
            attributes: self.attributes(start)?,
            xml: self.read_raw(start, empty)?,
        })
    }

    /// Character data of a simple element.
    ///
    /// Entities in text are resolved and CDATA sections are taken literally.
    /// Comments and processing instructions are dropped.
    fn read_string(&mut self, empty: bool) -> Result<String, CodecError> {
        let mut value = String::new();
        if empty {
            return Ok(value);
        }

        let mut depth = 0usize;
        loop {
            match self.reader.read_event()? {
                Event::Text(e) => value.push_str(&e.unescape()?),
                Event::CData(e) => value.push_str(&self.reader.decoder().decode(&e)?),
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(CodecError::UnexpectedEof),
                _ => {}
            }
        }

        Ok(value)
    }

    /// Inner markup of an element exactly as written.
    fn read_raw(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<String, CodecError> {
        if empty {
            return Ok(String::new());
        }
        Ok(self.reader.read_text(start.name())?.into_owned())
    }

    fn skip_children(&mut self, start: &BytesStart<'a>, empty: bool) -> Result<(), CodecError> {
        if !empty {
            self.reader.read_to_end(start.name())?;
            tracing::debug!(
                element = %String::from_utf8_lossy(start.name().as_ref()),
                "Skipped content of empty-model element"
            );
        }
        Ok(())
    }

    fn name(&self, start: &BytesStart<'_>) -> Result<String, CodecError> {
        Ok(self
            .reader
            .decoder()
            .decode(start.name().as_ref())?
            .into_owned())
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Attributes, CodecError> {
        let decoder = self.reader.decoder();
        start
            .attributes()
            .map(|attr| -> Result<(String, String), CodecError> {
                let attr = attr?;
                let key = decoder.decode(attr.key.as_ref())?.into_owned();
                let value = attr.decode_and_unescape_value(decoder)?.into_owned();
                Ok((key, value))
            })
            .collect()
    }
}

fn attribute(attrs: &[(String, String)], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

fn common(attrs: &[(String, String)]) -> Common {
    Common {
        base: attribute(attrs, "xml:base"),
        lang: attribute(attrs, "xml:lang"),
    }
}

/// Prefixed namespace declarations, kept so extension elements stay bound.
fn namespaces(attrs: &[(String, String)]) -> Vec<(String, String)> {
    attrs
        .iter()
        .filter(|(key, _)| key.starts_with("xmlns:"))
        .cloned()
        .collect()
}

/// Attributes other than `xml:*` and namespace declarations have no place in
/// the model and are not kept.
fn log_unknown_attributes(element: &str, attrs: &[(String, String)]) {
    for (key, _) in attrs {
        if key.starts_with("xml:") || key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        tracing::debug!(element, attribute = %key, "Dropped unknown attribute");
    }
}
