//! Devhelp index document assembly and serialization.
//!
//! [`IndexDocument`] is the in-memory form of one `.devhelp2` file: header
//! attributes, a chapter tree mirroring the page hierarchy, and a flat
//! keyword list. Serialization is explicit string assembly with a fixed
//! layout — two-space indentation, one element per line — so identical
//! input always produces identical bytes.

use std::fmt::Write;

/// Devhelp book namespace.
const BOOK_NAMESPACE: &str = "http://www.devhelp.net/book";

/// Fixed document type declaration carried by every index file.
const DOCTYPE: &str = r#"<!DOCTYPE book PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "">"#;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

const INDENT: &str = "  ";

/// A chapter node mirroring the page hierarchy of one extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chapter {
    /// Display name shown in the help browser's contents pane.
    pub name: String,
    /// Navigation target, relative to the index file.
    pub link: String,
    /// Child chapters, in subpage order.
    pub children: Vec<Chapter>,
}

/// A searchable keyword entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyword {
    /// Category tag (`function`, `struct`, ...).
    pub kind: &'static str,
    /// Display name shown in the help browser's search pane.
    pub name: String,
    /// Anchor target, relative to the index file.
    pub link: String,
}

/// A complete devhelp index document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDocument {
    /// Book title shown in the help browser.
    pub title: String,
    /// Link to the book's landing page.
    pub link: String,
    /// Unique book name; also the output file stem.
    pub name: String,
    /// Language tag; may be empty.
    pub language: String,
    /// Top-level chapters.
    pub chapters: Vec<Chapter>,
    /// Flat keyword list, in page order then per-page symbol order.
    pub keywords: Vec<Keyword>,
}

impl IndexDocument {
    /// Serialize to the devhelp2 XML dialect.
    ///
    /// UTF-8 with an XML declaration and the fixed book DOCTYPE. The root
    /// `book` element carries the namespace and the five header attributes
    /// (`version` is the constant `"2"`); `chapters` precedes `functions`.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str(XML_DECL);
        out.push('\n');
        out.push_str(DOCTYPE);
        out.push('\n');
        write!(
            out,
            r#"<book xmlns="{}" title="{}" link="{}" name="{}" version="2" language="{}">"#,
            BOOK_NAMESPACE,
            escape_attr(&self.title),
            escape_attr(&self.link),
            escape_attr(&self.name),
            escape_attr(&self.language),
        )
        .unwrap();
        out.push('\n');

        if self.chapters.is_empty() {
            out.push_str("  <chapters />\n");
        } else {
            out.push_str("  <chapters>\n");
            for chapter in &self.chapters {
                write_chapter(chapter, 2, &mut out);
            }
            out.push_str("  </chapters>\n");
        }

        if self.keywords.is_empty() {
            out.push_str("  <functions />\n");
        } else {
            out.push_str("  <functions>\n");
            for keyword in &self.keywords {
                write!(
                    out,
                    r#"    <keyword type="{}" name="{}" link="{}" />"#,
                    keyword.kind,
                    escape_attr(&keyword.name),
                    escape_attr(&keyword.link),
                )
                .unwrap();
                out.push('\n');
            }
            out.push_str("  </functions>\n");
        }

        out.push_str("</book>\n");
        out
    }
}

/// Serialize a chapter node recursively at the given indent depth.
fn write_chapter(chapter: &Chapter, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    write!(
        out,
        r#"<sub name="{}" link="{}""#,
        escape_attr(&chapter.name),
        escape_attr(&chapter.link),
    )
    .unwrap();

    if chapter.children.is_empty() {
        out.push_str(" />\n");
    } else {
        out.push_str(">\n");
        for child in &chapter.children {
            write_chapter(child, depth + 1, out);
        }
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str("</sub>\n");
    }
}

/// Escape a string for use in an XML attribute value.
fn escape_attr(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    use super::*;

    fn sample_document() -> IndexDocument {
        IndexDocument {
            title: "myproj Core".to_owned(),
            link: "../myproj-html/html/index.html".to_owned(),
            name: "myproj-1.0".to_owned(),
            language: String::new(),
            chapters: vec![Chapter {
                name: "Tutorial".to_owned(),
                link: "../myproj-html/html/tutorial.html".to_owned(),
                children: vec![Chapter {
                    name: "Basics".to_owned(),
                    link: "../myproj-html/html/basics.html".to_owned(),
                    children: Vec::new(),
                }],
            }],
            keywords: vec![
                Keyword {
                    kind: "function",
                    name: "hb_frob".to_owned(),
                    link: "../myproj-html/html/api.html#hb-frob".to_owned(),
                },
                Keyword {
                    kind: "struct",
                    name: "HbFrobber".to_owned(),
                    link: "../myproj-html/html/api.html#HbFrobber".to_owned(),
                },
            ],
        }
    }

    #[test]
    fn test_to_xml_golden() {
        let expected = "\
<?xml version=\"1.0\" encoding=\"utf-8\"?>
<!DOCTYPE book PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"\">
<book xmlns=\"http://www.devhelp.net/book\" title=\"myproj Core\" link=\"../myproj-html/html/index.html\" name=\"myproj-1.0\" version=\"2\" language=\"\">
  <chapters>
    <sub name=\"Tutorial\" link=\"../myproj-html/html/tutorial.html\">
      <sub name=\"Basics\" link=\"../myproj-html/html/basics.html\" />
    </sub>
  </chapters>
  <functions>
    <keyword type=\"function\" name=\"hb_frob\" link=\"../myproj-html/html/api.html#hb-frob\" />
    <keyword type=\"struct\" name=\"HbFrobber\" link=\"../myproj-html/html/api.html#HbFrobber\" />
  </functions>
</book>
";
        assert_eq!(sample_document().to_xml(), expected);
    }

    #[test]
    fn test_to_xml_empty_document_self_closes() {
        let document = IndexDocument {
            title: "myproj Core".to_owned(),
            link: "index.html".to_owned(),
            name: "myproj".to_owned(),
            language: "c".to_owned(),
            chapters: Vec::new(),
            keywords: Vec::new(),
        };

        let xml = document.to_xml();
        assert!(xml.contains("  <chapters />\n"));
        assert!(xml.contains("  <functions />\n"));
        assert!(xml.contains(r#"language="c""#));
    }

    #[test]
    fn test_to_xml_is_byte_stable() {
        assert_eq!(sample_document().to_xml(), sample_document().to_xml());
    }

    #[test]
    fn test_to_xml_escapes_attribute_values() {
        let document = IndexDocument {
            title: "a & b <c>".to_owned(),
            link: "page.html?x=\"1\"".to_owned(),
            name: "n".to_owned(),
            language: String::new(),
            chapters: Vec::new(),
            keywords: Vec::new(),
        };

        let xml = document.to_xml();
        assert!(xml.contains(r#"title="a &amp; b &lt;c&gt;""#));
        assert!(xml.contains(r#"link="page.html?x=&quot;1&quot;""#));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("plain"), "plain");
        assert_eq!(escape_attr("a<b&'c'"), "a&lt;b&amp;&apos;c&apos;");
    }

    #[test]
    fn test_to_xml_round_trips_as_well_formed_xml() {
        let xml = sample_document().to_xml();
        let mut reader = Reader::from_str(&xml);

        let mut elements = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    elements.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // Root first, chapters before functions, one keyword element per entry.
        assert_eq!(
            elements,
            vec!["book", "chapters", "sub", "sub", "functions", "keyword", "keyword"]
        );
    }

    #[test]
    fn test_to_xml_root_attributes_parse_back() {
        let xml = sample_document().to_xml();
        let mut reader = Reader::from_str(&xml);

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"book" => {
                    let mut attrs = std::collections::HashMap::new();
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        attrs.insert(
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            attr.unescape_value().unwrap().into_owned(),
                        );
                    }
                    assert_eq!(attrs.get("xmlns").map(String::as_str), Some(BOOK_NAMESPACE));
                    assert_eq!(attrs.get("title").map(String::as_str), Some("myproj Core"));
                    assert_eq!(attrs.get("name").map(String::as_str), Some("myproj-1.0"));
                    assert_eq!(attrs.get("version").map(String::as_str), Some("2"));
                    assert_eq!(attrs.get("language").map(String::as_str), Some(""));
                    return;
                }
                Event::Eof => panic!("no book element found"),
                _ => {}
            }
        }
    }
}
