//! DOM side of the viewer: menus, control panel and status line.
use bangun_core::{Category, MenuController, NetLayout, SceneController, ShapeError, Variant};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement};

use crate::error::{Result, ViewerError};

/// A click coming from one of the viewer's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shape(Category),
    /// Index into the open submenu's entries.
    Variant(usize),
    ToggleNet,
}

/// The viewer's DOM elements and their click listeners.
///
/// Dropping it unbinds the listeners and takes every element it added back
/// out of the container, so no button outlives its handler.
pub struct Ui {
    menu: HtmlElement,
    canvas: HtmlCanvasElement,
    primary: Vec<(Category, HtmlButtonElement)>,
    submenu: HtmlElement,
    submenu_title: HtmlElement,
    variants: Vec<HtmlButtonElement>,
    controls: HtmlElement,
    net_button: HtmlButtonElement,
    status: HtmlElement,
    listeners: Vec<(HtmlButtonElement, Closure<dyn FnMut()>)>,
}

impl Ui {
    /// Lay out menu, submenu, canvas, controls and status line inside
    /// `container`, in that order.
    pub fn build(document: &Document, container: &Element, canvas: &HtmlCanvasElement) -> Result<Self> {
        let menu: HtmlElement = create(document, "div")?;
        menu.set_class_name("bangun-menu");
        let mut primary = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let button: HtmlButtonElement = create(document, "button")?;
            button.set_text_content(Some(category.label()));
            menu.append_child(&button)?;
            primary.push((category, button));
        }

        let submenu: HtmlElement = create(document, "div")?;
        submenu.set_class_name("bangun-submenu");
        submenu.set_hidden(true);
        let submenu_title: HtmlElement = create(document, "span")?;
        submenu.append_child(&submenu_title)?;
        // One slot per side count; labels are filled in when a submenu opens.
        let mut variants = Vec::with_capacity(4);
        for _ in Variant::ALL {
            let button: HtmlButtonElement = create(document, "button")?;
            submenu.append_child(&button)?;
            variants.push(button);
        }

        let controls: HtmlElement = create(document, "div")?;
        controls.set_class_name("bangun-controls");
        controls.set_hidden(true);
        let net_button: HtmlButtonElement = create(document, "button")?;
        net_button.set_text_content(Some(net_button_label(NetLayout::Closed)));
        controls.append_child(&net_button)?;

        let status: HtmlElement = create(document, "div")?;
        status.set_class_name("bangun-status");

        container.append_child(&menu)?;
        container.append_child(&submenu)?;
        container.append_child(canvas)?;
        container.append_child(&controls)?;
        container.append_child(&status)?;

        Ok(Self {
            menu,
            canvas: canvas.clone(),
            primary,
            submenu,
            submenu_title,
            variants,
            controls,
            net_button,
            status,
            listeners: Vec::new(),
        })
    }

    /// Attach click listeners that forward to `on_action`.
    pub fn bind<F>(&mut self, on_action: F) -> Result<()>
    where
        F: Fn(Action) + Clone + 'static,
    {
        let targets = self
            .primary
            .iter()
            .map(|(category, button)| (Action::Shape(*category), button))
            .chain(self.variants.iter().enumerate().map(|(i, button)| (Action::Variant(i), button)))
            .chain(std::iter::once((Action::ToggleNet, &self.net_button)));

        let mut listeners = Vec::new();
        for (action, button) in targets {
            let on_action = on_action.clone();
            let listener = Closure::<dyn FnMut()>::new(move || on_action(action));
            button.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            listeners.push((button.clone(), listener));
        }
        self.listeners.extend(listeners);
        Ok(())
    }

    /// Bring the DOM in line with the menu and scene state.
    pub fn sync(&self, menu: &MenuController, scene: &SceneController, error: Option<&ShapeError>) {
        match menu.submenu() {
            Some(submenu) => {
                self.submenu_title.set_text_content(Some(&submenu.title()));
                for (button, entry) in self.variants.iter().zip(&submenu.entries) {
                    button.set_text_content(Some(&entry.label));
                }
                self.submenu.set_hidden(false);
            }
            None => self.submenu.set_hidden(true),
        }

        self.controls.set_hidden(!menu.controls_visible());
        self.net_button
            .set_text_content(Some(net_button_label(scene.net_layout())));
        self.status
            .set_text_content(Some(&status_text(menu, scene, error)));
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        for (button, listener) in self.listeners.drain(..) {
            let _ = button.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
        }
        self.menu.remove();
        self.submenu.remove();
        self.canvas.remove();
        self.controls.remove();
        self.status.remove();
        tracing::debug!("viewer elements removed");
    }
}

fn create<T: JsCast>(document: &Document, tag: &'static str) -> Result<T> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| ViewerError::Create(tag))
}

pub fn net_button_label(layout: NetLayout) -> &'static str {
    if layout.is_open() {
        "Tutup jaring-jaring"
    } else {
        "Buka jaring-jaring"
    }
}

/// Text for the status line below the canvas.
pub fn status_text(menu: &MenuController, scene: &SceneController, error: Option<&ShapeError>) -> String {
    if let Some(err) = error {
        return err.to_string();
    }
    match (scene.group(), menu.submenu()) {
        (Some(group), _) => group.shape().to_string(),
        (None, Some(submenu)) => submenu.title(),
        (None, None) => String::from("Pilih bangun ruang"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangun_core::{GeometryPool, ViewerConfig};

    fn scene() -> SceneController {
        SceneController::new(GeometryPool::new(), &ViewerConfig::default())
    }

    #[test]
    fn test_status_follows_menu() {
        let mut menu = MenuController::new();
        let mut scene = scene();
        assert_eq!(status_text(&menu, &scene, None), "Pilih bangun ruang");

        menu.select_shape("prisma", &mut scene).unwrap();
        assert_eq!(status_text(&menu, &scene, None), "Pilih prisma:");

        menu.select_variant("prisma-segienam", &mut scene).unwrap();
        assert_eq!(status_text(&menu, &scene, None), "prisma-segienam");
    }

    #[test]
    fn test_status_reports_errors() {
        let mut menu = MenuController::new();
        let mut scene = scene();
        let err = menu.select_shape("bola", &mut scene).unwrap_err();
        assert_eq!(status_text(&menu, &scene, Some(&err)), err.to_string());
    }

    #[test]
    fn test_net_button_label() {
        assert_eq!(net_button_label(NetLayout::Closed), "Buka jaring-jaring");
        assert_eq!(net_button_label(NetLayout::Open), "Tutup jaring-jaring");
    }
}
