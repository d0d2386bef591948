//! Shared fixture for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_select::{
    Content, ContentConfig, HorizontalAlign, Select, SelectConfig, SelectOption, Trigger, Value,
};
use horizon_select_core::{ConnectionGuard, Document, Host, NodeId, Point, PointerEvent, Rect, Size};

/// Trigger rectangle used throughout: left 100, top 50, right 260, bottom 80.
pub const TRIGGER_RECT: Rect = Rect::new(100.0, 50.0, 160.0, 30.0);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("horizon_select=debug,horizon_select_core=info")
        .with_test_writer()
        .try_init();
}

/// A select with options `model3` and `modelY`, every part attached and the
/// trigger laid out at [`TRIGGER_RECT`].
pub struct Fixture {
    pub doc: Arc<Document>,
    pub select: Select<&'static str>,
    pub trigger: Trigger<&'static str>,
    pub value: Value<&'static str>,
    pub content: Content<&'static str>,
    pub model3: SelectOption<&'static str>,
    pub model_y: SelectOption<&'static str>,
    /// An unrelated element on the page.
    pub heading: NodeId,
}

impl Fixture {
    pub fn new(config: SelectConfig) -> Self {
        Self::with_align(config, HorizontalAlign::Center)
    }

    pub fn with_align(config: SelectConfig, align: HorizontalAlign) -> Self {
        Self::on_document(&Document::new(Size::new(1280.0, 720.0)), config, align)
    }

    /// Build the select on an existing document, next to whatever is already
    /// on the page.
    pub fn on_document(doc: &Arc<Document>, config: SelectConfig, align: HorizontalAlign) -> Self {
        init_tracing();
        let doc = doc.clone();
        let heading = doc_node(&doc, "heading");

        let select = Select::new(doc.clone(), config).unwrap();
        let trigger = select.trigger().unwrap();
        let value = select.value();
        let content = select
            .content(ContentConfig::new().with_align(align))
            .unwrap();
        let model3 = content.option("model3", "Model 3");
        let model_y = content.option("modelY", "Model Y");

        trigger.attach().unwrap();
        content.attach().unwrap();
        model3.attach().unwrap();
        model_y.attach().unwrap();
        doc.set_layout(trigger.node(), TRIGGER_RECT);

        Self {
            doc,
            select,
            trigger,
            value,
            content,
            model3,
            model_y,
            heading,
        }
    }

    /// Click the trigger through the document.
    pub fn click_trigger(&self) {
        self.doc.click(Some(self.trigger.node()), Point::new(120.0, 60.0));
    }

    /// Click an option's row through the document.
    pub fn click_option(&self, option: &SelectOption<&'static str>) {
        self.doc.click(option.node(), Point::new(120.0, 100.0));
    }

    /// Click the unrelated heading.
    pub fn click_outside(&self) {
        self.doc.click(Some(self.heading), Point::new(600.0, 20.0));
    }
}

pub fn doc_node(doc: &Arc<Document>, name: &str) -> NodeId {
    doc.create_node(None, name).unwrap()
}

/// A page button whose click handler stops propagation. Keep the guard alive
/// for as long as the handler should run.
pub fn stopping_button(doc: &Arc<Document>) -> (NodeId, ConnectionGuard<PointerEvent>) {
    let button = doc_node(doc, "stopping-button");
    let guard = doc
        .on_click(button, Box::new(|event: &PointerEvent| event.stop_propagation()))
        .unwrap();
    (button, guard)
}
