//! Attach/detach lifecycle, listener ownership and node cleanup.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_select::{ContentConfig, HorizontalAlign, OptionId, Select, SelectConfig, SelectError, ValueProjection};
use horizon_select_core::{
    BoxedTask, ClickHandler, ConnectionGuard, Document, FocusChange, Host, HostError, LayoutChange,
    LayoutHost, NodeError, NodeId, Point, PointerEvent, PortalHandle, Rect, RenderTarget, Signal,
    Size, TaskId,
};
use parking_lot::Mutex;

use common::Fixture;

fn document_listener_counts(f: &Fixture) -> (usize, usize, usize) {
    (
        f.doc.pointer_down().connection_count(),
        f.doc.resized().connection_count(),
        f.doc.layout_changed().connection_count(),
    )
}

#[test]
fn test_listeners_installed_only_while_open() {
    let f = Fixture::new(SelectConfig::new());
    assert_eq!(document_listener_counts(&f), (0, 0, 0));
    assert!(!f.content.is_active());

    f.click_trigger();
    assert_eq!(document_listener_counts(&f), (1, 1, 1));
    assert!(f.content.is_active());

    f.click_trigger();
    assert_eq!(document_listener_counts(&f), (0, 0, 0));
}

#[test]
fn test_no_listener_leak_across_cycles() {
    let f = Fixture::new(SelectConfig::new());
    for _ in 0..10 {
        f.click_trigger();
        f.click_outside();
        f.click_trigger();
        f.click_option(&f.model3);
    }
    assert_eq!(document_listener_counts(&f), (0, 0, 0));
    assert!(!f.select.is_open());
}

#[test]
fn test_align_change_while_open_does_not_duplicate_listeners() {
    let f = Fixture::new(SelectConfig::new());
    f.click_trigger();
    f.content.set_align(HorizontalAlign::Right);
    f.content.set_align(HorizontalAlign::Left);
    assert_eq!(document_listener_counts(&f), (1, 1, 1));
}

#[test]
fn test_dropping_open_content_removes_listeners() {
    let Fixture {
        doc,
        select,
        content,
        trigger,
        ..
    } = Fixture::new(SelectConfig::new());
    trigger.click();
    assert_eq!(doc.pointer_down().connection_count(), 1);

    drop(content);
    assert_eq!(doc.pointer_down().connection_count(), 0);
    assert_eq!(doc.portal_count(), 0);
    assert_eq!(select.open_changed().connection_count(), 0);
}

#[test]
fn test_detach_content_while_open() {
    let f = Fixture::new(SelectConfig::new());
    f.click_trigger();

    f.content.detach().unwrap();
    assert!(!f.content.is_active());
    assert!(!f.content.is_visible());
    assert_eq!(document_listener_counts(&f), (0, 0, 0));
    assert!(f.doc.visible_panels().is_empty());

    f.content.attach().unwrap();
    assert!(f.content.is_active());
    assert_eq!(f.doc.visible_panels(), vec![f.content.panel_node()]);
}

#[test]
fn test_panel_visibility_follows_open_state() {
    let f = Fixture::new(SelectConfig::new());
    assert_eq!(f.doc.portal_count(), 1);
    assert!(f.doc.visible_panels().is_empty());

    f.select.open();
    assert_eq!(f.doc.visible_panels(), vec![f.content.panel_node()]);

    f.select.close();
    assert!(f.doc.visible_panels().is_empty());
}

#[test]
fn test_options_stay_registered_while_closed() {
    let f = Fixture::new(SelectConfig::new());
    assert_eq!(f.select.option_count(), 2);
    assert!(f.model3.node().is_some());
    assert!(f.doc.contains_node(f.content.panel_node(), f.model3.node().unwrap()));
}

#[test]
fn test_option_attach_is_idempotent() {
    let f = Fixture::new(SelectConfig::new());
    let node = f.model3.node();
    f.model3.attach().unwrap();
    assert_eq!(f.model3.node(), node);
    assert_eq!(f.select.option_count(), 2);
}

#[test]
fn test_duplicate_id_overwrites_in_place() {
    let f = Fixture::new(SelectConfig::new());
    let replacement = f.content.option("model3", "Model 3 Performance");
    assert_eq!(replacement.id(), &OptionId::from("model3"));
    assert_eq!(*replacement.content(), "Model 3 Performance");
    replacement.attach().unwrap();

    let options = f.select.options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].id, OptionId::from("model3"));
    assert_eq!(options[0].content, "Model 3 Performance");
}

#[test]
fn test_detached_option_keeps_registry_entry() {
    let f = Fixture::new(SelectConfig::new());
    f.model_y.detach();
    assert!(f.model_y.node().is_none());
    assert_eq!(f.select.option_count(), 2);
    assert!(f.select.select("modelY").unwrap());
}

#[test]
fn test_default_applies_once() {
    let f = Fixture::new(SelectConfig::new().with_default_value("modelY"));
    f.click_trigger();
    f.click_option(&f.model3);

    assert!(!f.model_y.sync_default());
    f.model_y.detach();
    f.model_y.attach().unwrap();
    assert_eq!(f.select.selected_id(), Some(OptionId::from("model3")));
}

#[test]
fn test_default_does_not_open() {
    let f = Fixture::new(SelectConfig::new().with_default_value("model3"));
    assert!(f.model3.is_selected());
    assert!(!f.select.is_open());
    assert!(!f.content.is_active());
}

#[test]
fn test_zero_options_shows_placeholder() {
    let doc = Document::new(Size::new(800.0, 600.0));
    let select: Select<String> =
        Select::new(doc.clone(), SelectConfig::new().with_placeholder("Pick a trim")).unwrap();
    let value = select.value();
    let content = select.content(ContentConfig::default()).unwrap();
    content.attach().unwrap();

    assert_eq!(
        value.project(),
        ValueProjection::Placeholder("Pick a trim".to_owned())
    );
    assert_eq!(value.text().as_deref(), Some("Pick a trim"));
}

#[test]
fn test_trigger_focus_tracking() {
    let f = Fixture::new(SelectConfig::new());
    let changes = Arc::new(Mutex::new(Vec::new()));
    let c = changes.clone();
    f.trigger.focus_changed().connect(move |&focused| c.lock().push(focused));

    f.doc.set_focus(Some(f.trigger.node()));
    assert!(f.trigger.is_focused());
    f.doc.set_focus(Some(f.heading));
    assert!(!f.trigger.is_focused());
    f.doc.set_focus(None);

    assert_eq!(*changes.lock(), vec![true, false]);
    assert!(!f.select.is_open());
}

#[test]
fn test_trigger_render_requires_attach() {
    let f = Fixture::new(SelectConfig::new());
    f.trigger.render().unwrap();

    f.trigger.detach();
    assert!(!f.trigger.is_attached());
    assert!(matches!(f.trigger.render(), Err(SelectError::PartDetached)));

    f.click_trigger();
    assert!(!f.select.is_open());
}

#[test]
fn test_open_changed_signal() {
    let f = Fixture::new(SelectConfig::new());
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    f.select.open_changed().connect(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    f.click_trigger();
    f.click_outside();
    f.click_outside();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dropping_everything_removes_nodes() {
    let doc = Document::new(Size::new(800.0, 600.0));
    let baseline = doc.with_tree(|tree| tree.node_count());
    {
        let select: Select<&'static str> = Select::new(doc.clone(), SelectConfig::new()).unwrap();
        let trigger = select.trigger().unwrap();
        let content = select.content(ContentConfig::default()).unwrap();
        let option = content.option(1_i64, "One");
        trigger.attach().unwrap();
        content.attach().unwrap();
        option.attach().unwrap();
        select.open();
        assert!(doc.with_tree(|tree| tree.node_count()) > baseline);
    }
    assert_eq!(doc.with_tree(|tree| tree.node_count()), baseline);
    assert_eq!(doc.portal_count(), 0);
    assert_eq!(doc.pointer_down().connection_count(), 0);
    assert_eq!(doc.focus_changed().connection_count(), 0);
}

/// A document that refuses click handlers.
struct NoClickHost(Arc<Document>);

impl LayoutHost for NoClickHost {
    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.0.bounding_rect(node)
    }

    fn scroll_offset(&self) -> Point {
        self.0.scroll_offset()
    }
}

impl RenderTarget for NoClickHost {
    fn mount(&self, panel: NodeId) -> horizon_select_core::Result<PortalHandle> {
        self.0.mount(panel)
    }

    fn unmount(&self, handle: PortalHandle) -> horizon_select_core::Result<()> {
        self.0.unmount(handle)
    }

    fn set_visible(&self, handle: PortalHandle, visible: bool) -> horizon_select_core::Result<()> {
        self.0.set_visible(handle, visible)
    }
}

impl Host for NoClickHost {
    fn create_node(&self, parent: Option<NodeId>, name: &str) -> horizon_select_core::Result<NodeId> {
        self.0.create_node(parent, name)
    }

    fn remove_node(&self, node: NodeId) -> horizon_select_core::Result<()> {
        self.0.remove_node(node)
    }

    fn contains_node(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.0.contains_node(ancestor, node)
    }

    fn on_click(
        &self,
        _node: NodeId,
        _handler: ClickHandler,
    ) -> horizon_select_core::Result<ConnectionGuard<PointerEvent>> {
        Err(HostError::Node(NodeError::InvalidNodeId))
    }

    fn pointer_down(&self) -> &Arc<Signal<PointerEvent>> {
        self.0.pointer_down()
    }

    fn resized(&self) -> &Arc<Signal<Size>> {
        self.0.resized()
    }

    fn layout_changed(&self) -> &Arc<Signal<LayoutChange>> {
        self.0.layout_changed()
    }

    fn focus_changed(&self) -> &Arc<Signal<FocusChange>> {
        self.0.focus_changed()
    }

    fn post_task(&self, task: BoxedTask) -> TaskId {
        self.0.post_task(task)
    }

    fn cancel_task(&self, id: TaskId) -> bool {
        self.0.cancel_task(id)
    }
}

#[test]
fn test_failed_option_attach_removes_its_node() {
    let doc = Document::new(Size::new(800.0, 600.0));
    let select: Select<&'static str> =
        Select::new(Arc::new(NoClickHost(doc.clone())), SelectConfig::new()).unwrap();
    let content = select.content(ContentConfig::default()).unwrap();
    content.attach().unwrap();
    let baseline = doc.with_tree(|tree| tree.node_count());

    let option = content.option("model3", "Model 3");
    assert!(matches!(option.attach(), Err(SelectError::Host(_))));
    assert!(!option.is_attached());
    assert!(option.node().is_none());
    assert_eq!(doc.with_tree(|tree| tree.node_count()), baseline);
    assert_eq!(select.option_count(), 0);
}
