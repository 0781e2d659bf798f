//! In-memory document model backing the page controller.
//!
//! Elements are arena-allocated nodes addressed by [`NodeId`] handles. Hosts
//! resolve handles up front and pass them into behavior functions instead of
//! querying global state, so every page interaction can be exercised without
//! a live browser document. Lookups (`element_by_id`, `first_by_class`) only
//! see connected elements, matching how a real document resolves queries.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Handle to one element in a [`Document`]. Only valid for the document that
/// minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    text: String,
    value: String,
    attributes: HashMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Default)]
struct DocumentState {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
    location_path: String,
    scrolled_to: Option<NodeId>,
}

impl DocumentState {
    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn is_connected(&self, root: NodeId, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// A single page's element tree plus the handful of host properties the
/// controller touches (location path, scroll target).
pub struct Document {
    inner: Mutex<DocumentState>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut state = DocumentState::default();
        let root = state.alloc("html");
        let head = state.alloc("head");
        let body = state.alloc("body");
        state.attach(root, head);
        state.attach(root, body);
        Self {
            inner: Mutex::new(state),
            root,
            head,
            body,
        }
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub async fn create_element(&self, tag: &str) -> NodeId {
        self.inner.lock().await.alloc(tag)
    }

    /// Assigns the element's document id and registers it for
    /// [`Document::element_by_id`] lookups.
    pub async fn set_id(&self, node: NodeId, id: &str) {
        let mut state = self.inner.lock().await;
        state.ids.insert(id.to_string(), node);
    }

    pub async fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.inner.lock().await;
        state
            .ids
            .get(id)
            .copied()
            .filter(|node| state.is_connected(self.root, *node))
    }

    pub async fn first_by_class(&self, class: &str) -> Option<NodeId> {
        let state = self.inner.lock().await;
        (0..state.nodes.len()).map(NodeId).find(|node| {
            state.is_connected(self.root, *node)
                && state.nodes[node.0].classes.iter().any(|c| c == class)
        })
    }

    pub async fn append_child(&self, parent: NodeId, child: NodeId) {
        self.inner.lock().await.attach(parent, child);
    }

    /// Replaces the container's entire content, detaching previous children.
    pub async fn replace_children(&self, parent: NodeId, children: Vec<NodeId>) {
        let mut state = self.inner.lock().await;
        let previous = std::mem::take(&mut state.nodes[parent.0].children);
        for child in previous {
            state.nodes[child.0].parent = None;
        }
        for child in children {
            state.attach(parent, child);
        }
    }

    pub async fn remove(&self, node: NodeId) {
        self.inner.lock().await.detach(node);
    }

    pub async fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let state = self.inner.lock().await;
        let mut current = node;
        loop {
            if current == ancestor {
                return true;
            }
            match state.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub async fn tag(&self, node: NodeId) -> String {
        self.inner.lock().await.nodes[node.0].tag.clone()
    }

    pub async fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.lock().await.nodes[node.0].children.clone()
    }

    pub async fn child_count(&self, node: NodeId) -> usize {
        self.inner.lock().await.nodes[node.0].children.len()
    }

    pub async fn text(&self, node: NodeId) -> String {
        self.inner.lock().await.nodes[node.0].text.clone()
    }

    pub async fn set_text(&self, node: NodeId, text: &str) {
        self.inner.lock().await.nodes[node.0].text = text.to_string();
    }

    pub async fn value(&self, node: NodeId) -> String {
        self.inner.lock().await.nodes[node.0].value.clone()
    }

    pub async fn set_value(&self, node: NodeId, value: &str) {
        self.inner.lock().await.nodes[node.0].value = value.to_string();
    }

    pub async fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.lock().await.nodes[node.0]
            .attributes
            .get(name)
            .cloned()
    }

    pub async fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.inner.lock().await.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub async fn remove_attribute(&self, node: NodeId, name: &str) {
        self.inner.lock().await.nodes[node.0].attributes.remove(name);
    }

    pub async fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner.lock().await.nodes[node.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    pub async fn add_class(&self, node: NodeId, class: &str) {
        let mut state = self.inner.lock().await;
        let classes = &mut state.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub async fn remove_class(&self, node: NodeId, class: &str) {
        let mut state = self.inner.lock().await;
        state.nodes[node.0].classes.retain(|c| c != class);
    }

    /// Returns whether the class is present after the toggle.
    pub async fn toggle_class(&self, node: NodeId, class: &str) -> bool {
        let mut state = self.inner.lock().await;
        let classes = &mut state.nodes[node.0].classes;
        if classes.iter().any(|c| c == class) {
            classes.retain(|c| c != class);
            false
        } else {
            classes.push(class.to_string());
            true
        }
    }

    /// Collects `name`-attributed descendants of `form` into a field map.
    pub async fn form_data(&self, form: NodeId) -> HashMap<String, String> {
        let state = self.inner.lock().await;
        let mut fields = HashMap::new();
        let mut pending = state.nodes[form.0].children.clone();
        while let Some(node) = pending.pop() {
            if let Some(name) = state.nodes[node.0].attributes.get("name") {
                fields.insert(name.clone(), state.nodes[node.0].value.clone());
            }
            pending.extend(state.nodes[node.0].children.iter().copied());
        }
        fields
    }

    /// Clears the values of every `name`-attributed descendant of `form`.
    pub async fn reset_form(&self, form: NodeId) {
        let mut state = self.inner.lock().await;
        let mut pending = state.nodes[form.0].children.clone();
        while let Some(node) = pending.pop() {
            pending.extend(state.nodes[node.0].children.iter().copied());
            if state.nodes[node.0].attributes.contains_key("name") {
                state.nodes[node.0].value.clear();
            }
        }
    }

    pub async fn location_path(&self) -> String {
        self.inner.lock().await.location_path.clone()
    }

    pub async fn set_location_path(&self, path: &str) {
        self.inner.lock().await.location_path = path.to_string();
    }

    pub async fn scroll_into_view(&self, node: NodeId) {
        self.inner.lock().await.scrolled_to = Some(node);
    }

    pub async fn scrolled_to(&self) -> Option<NodeId> {
        self.inner.lock().await.scrolled_to
    }

    /// Installs a one-off stylesheet into the document head. Returns `false`
    /// when a connected element with `style_id` is already present.
    pub async fn install_style(&self, style_id: &str, css: &str) -> bool {
        {
            let state = self.inner.lock().await;
            if let Some(existing) = state.ids.get(style_id) {
                if state.is_connected(self.root, *existing) {
                    return false;
                }
            }
        }
        let style = self.create_element("style").await;
        self.set_id(style, style_id).await;
        self.set_text(style, css).await;
        self.append_child(self.head, style).await;
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
