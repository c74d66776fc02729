//! Browser-only checks of the viewer's DOM handling.
//!
//! Run with `wasm-pack test --headless --firefox bangun-web`.
#![cfg(target_arch = "wasm32")]

use bangun_web::{Action, Ui};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

fn container() -> (Document, Element) {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    (document, container)
}

fn canvas(document: &Document) -> HtmlCanvasElement {
    document.create_element("canvas").unwrap().dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn dropping_ui_removes_its_elements() {
    let (document, container) = container();
    let mut ui = Ui::build(&document, &container, &canvas(&document)).unwrap();
    ui.bind(|_: Action| {}).unwrap();
    // menu, submenu, canvas, controls, status
    assert_eq!(container.child_element_count(), 5);

    drop(ui);
    assert_eq!(container.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn buttons_forward_their_action() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (document, container) = container();
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let mut ui = Ui::build(&document, &container, &canvas(&document)).unwrap();
    let sink = clicked.clone();
    ui.bind(move |action| sink.borrow_mut().push(action)).unwrap();

    let first = container
        .query_selector(".bangun-menu button")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    first.click();
    assert_eq!(
        clicked.borrow().as_slice(),
        &[Action::Shape(bangun_core::Category::Kubus)]
    );

    drop(ui);
    // Detached and unbound: a stale click reaches nothing.
    first.click();
    assert_eq!(clicked.borrow().len(), 1);
}
