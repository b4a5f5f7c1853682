//! In-memory model of the designer the executor edits.
//!
//! Elements live in an arena owned by [`Designer`] and are addressed by
//! [`ElementId`]. A freshly created element is detached; it becomes part
//! of a page only through [`Designer::append_child`].

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use flowbridge_core::types::OrderedMap;

use crate::assets::Asset;

/// Arena index of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.to_string()
    }
}

/// What an element can hold, resolved once from its kind at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Text-bearing element (headings, paragraphs, links, ...). Holds text
    /// and inline children.
    Text,
    /// Structural container (`div`, `section`, ...). Holds children only.
    Structure,
    /// Holds an image asset and alt text, never children.
    Image,
    /// Holds nothing (`br`, `hr`, form inputs, ...).
    Void,
}

impl Capability {
    pub fn for_kind(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "img" | "image" => Capability::Image,
            "br" | "hr" | "input" | "meta" | "link" | "source" | "embed" => Capability::Void,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "span" | "a" | "li" | "button"
            | "label" | "blockquote" | "figcaption" | "strong" | "em" | "b" | "i" | "small"
            | "code" | "pre" | "td" | "th" | "option" | "textarea" => Capability::Text,
            _ => Capability::Structure,
        }
    }

    pub fn holds_children(self) -> bool {
        matches!(self, Capability::Text | Capability::Structure)
    }

    pub fn holds_text(self) -> bool {
        matches!(self, Capability::Text)
    }

    pub fn holds_asset(self) -> bool {
        matches!(self, Capability::Image)
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub kind: String,
    pub capability: Capability,
    pub attributes: OrderedMap,
    pub inline_styles: OrderedMap,
    pub text: Option<String>,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
    /// Named styles applied to the element, in application order.
    pub classes: Vec<String>,
    pub asset_id: Option<String>,
    pub alt: Option<String>,
}

impl Element {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            capability: Capability::for_kind(kind),
            attributes: OrderedMap::new(),
            inline_styles: OrderedMap::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            classes: Vec::new(),
            asset_id: None,
            alt: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    /// Document root of the page (a `body` container).
    pub root: ElementId,
}

/// A named, reusable style.
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub name: String,
    pub properties: OrderedMap,
    pub parent: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("<{kind}> cannot hold children")]
    ChildrenNotAllowed { kind: String },

    #[error("<{kind}> cannot hold text")]
    TextNotAllowed { kind: String },

    #[error("element {0} is already attached")]
    AlreadyAttached(ElementId),
}

/// The executor's live environment: pages, elements, styles and assets.
#[derive(Debug)]
pub struct Designer {
    elements: Vec<Element>,
    pages: Vec<Page>,
    current_page: Option<usize>,
    selected: Option<ElementId>,
    styles: IndexMap<String, Style>,
    assets: Vec<Asset>,
}

impl Designer {
    /// An empty designer with no pages.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            pages: Vec::new(),
            current_page: None,
            selected: None,
            styles: IndexMap::new(),
            assets: Vec::new(),
        }
    }

    /// A designer opened on a single `Home` page.
    pub fn with_home_page() -> Self {
        let mut designer = Self::new();
        let page_id = designer.create_page("Home", Some("home")).id.clone();
        designer.switch_to(&page_id);
        designer
    }

    // -- elements ----------------------------------------------------------

    /// Create a detached element of the given kind.
    pub fn create_element(&mut self, kind: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(kind));
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, DocumentError> {
        self.elements
            .get_mut(id.0)
            .ok_or(DocumentError::UnknownElement(id))
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map_or(&[], |el| el.children.as_slice())
    }

    /// Attach a detached element as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DocumentError> {
        let child_el = self.element(child).ok_or(DocumentError::UnknownElement(child))?;
        if child_el.parent.is_some() || self.is_page_root(child) {
            return Err(DocumentError::AlreadyAttached(child));
        }

        let parent_el = self.element_mut(parent)?;
        if !parent_el.capability.holds_children() {
            return Err(DocumentError::ChildrenNotAllowed {
                kind: parent_el.kind.clone(),
            });
        }
        parent_el.children.push(child);
        self.element_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn set_attribute(&mut self, id: ElementId, key: &str, value: &str) -> Result<(), DocumentError> {
        self.element_mut(id)?
            .attributes
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Merge a batch of inline style properties; later keys win.
    pub fn set_inline_styles(&mut self, id: ElementId, styles: &OrderedMap) -> Result<(), DocumentError> {
        let el = self.element_mut(id)?;
        el.inline_styles
            .extend(styles.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(id)?;
        if !el.capability.holds_text() {
            return Err(DocumentError::TextNotAllowed {
                kind: el.kind.clone(),
            });
        }
        el.text = Some(text.to_string());
        Ok(())
    }

    pub fn add_class(&mut self, id: ElementId, style_name: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(id)?;
        if !el.classes.iter().any(|c| c == style_name) {
            el.classes.push(style_name.to_string());
        }
        Ok(())
    }

    /// Attach an asset. Returns `false` when the element cannot hold one.
    pub fn set_asset(&mut self, id: ElementId, asset_id: &str) -> Result<bool, DocumentError> {
        let el = self.element_mut(id)?;
        if !el.capability.holds_asset() {
            return Ok(false);
        }
        el.asset_id = Some(asset_id.to_string());
        Ok(true)
    }

    /// Set alt text. Returns `false` when the element cannot hold one.
    pub fn set_alt(&mut self, id: ElementId, alt: &str) -> Result<bool, DocumentError> {
        let el = self.element_mut(id)?;
        if !el.capability.holds_asset() {
            return Ok(false);
        }
        el.alt = Some(alt.to_string());
        Ok(true)
    }

    /// Every element of the current page in pre-order, root first.
    pub fn traverse(&self) -> Vec<ElementId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };

        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    // -- pages -------------------------------------------------------------

    pub fn create_page(&mut self, name: &str, slug: Option<&str>) -> &Page {
        let root = self.create_element("body");
        self.pages.push(Page {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            slug: slug.map(str::to_string),
            root,
        });
        &self.pages[self.pages.len() - 1]
    }

    /// Make a page current. Clears the selection, which belonged to the
    /// previous page.
    pub fn switch_to(&mut self, page_id: &str) -> bool {
        match self.pages.iter().position(|p| p.id == page_id) {
            Some(index) => {
                self.current_page = Some(index);
                self.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page.and_then(|index| self.pages.get(index))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Root element of the current page.
    pub fn root(&self) -> Option<ElementId> {
        self.current_page().map(|page| page.root)
    }

    fn is_page_root(&self, id: ElementId) -> bool {
        self.pages.iter().any(|page| page.root == id)
    }

    /// Set the current selection.
    ///
    /// The executor never selects anything on its own; the selection is
    /// driven by the host embedding the designer (and by tests). With no
    /// selection, `BUILD_TREE` targeting `selected` lands on the page root.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    // -- styles ------------------------------------------------------------

    /// Return the named style, creating it if it does not exist yet.
    pub fn upsert_style(&mut self, name: &str) -> &mut Style {
        self.styles.entry(name.to_string()).or_insert_with(|| Style {
            name: name.to_string(),
            ..Style::default()
        })
    }

    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    // -- assets ------------------------------------------------------------

    pub fn find_asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Store an asset in the library and return its id.
    pub fn add_asset(&mut self, asset: Asset) -> String {
        let id = asset.id.clone();
        self.assets.push(asset);
        id
    }
}

impl Default for Designer {
    fn default() -> Self {
        Self::with_home_page()
    }
}
