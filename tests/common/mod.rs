//! Shared test support: an in-memory scripting engine and a recording
//! screenshot sink, so the keyword surface can be exercised end to end
//! without a running GUI.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Result};

use sapgui_driver::backend::{
    GuiConnection, GuiElement, GuiSession, RootLocator, ScriptingRoot,
};
use sapgui_driver::{DriverConfig, SapGuiDriver, ScreenshotSink};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Mutable state of one mock control, shared between the test and the
/// transient handles the driver resolves.
#[derive(Default)]
pub struct ControlState {
    pub tag: String,
    pub text: String,
    pub selected: bool,
    pub focus_count: u32,
    pub press_count: u32,
    pub select_count: u32,
    pub double_clicks: Vec<(String, String)>,
    pub cells: HashMap<(i64, String), String>,
    pub row_count: i64,
    pub scroll_position: i64,
    pub columns: Vec<String>,
    pub selected_columns: Vec<String>,
    pub selected_rows: Option<String>,
    pub grid_rows_selectable: bool,
    pub absolute_rows: HashMap<i64, Rc<RefCell<ControlState>>>,
    pub has_toolbar_press: bool,
    pub toolbar_buttons: Vec<String>,
    pub toolbar_pressed: Vec<String>,
    pub legacy_buttons: Vec<String>,
    pub legacy_pressed: Vec<String>,
    pub has_node_context_menu: bool,
    pub has_context_button: bool,
    pub context_menu_opened: Vec<String>,
    pub context_items_selected: Vec<String>,
    pub selected_node: Option<String>,
    pub expandable: bool,
    pub expanded_nodes: Vec<String>,
    pub selected_items: Vec<(String, String)>,
    pub clicked_links: Vec<(String, String)>,
    pub node_buttons_pressed: Vec<(String, String)>,
    pub vkeys_sent: Vec<u16>,
    pub maximize_count: u32,
    pub screen_position: (i64, i64),
}

pub type SharedControl = Rc<RefCell<ControlState>>;

/// The in-memory window tree behind the mock engine.
#[derive(Clone, Default)]
pub struct MockGui {
    controls: Rc<RefCell<HashMap<String, SharedControl>>>,
}

impl MockGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a control under the given id and returns its state.
    pub fn add(&self, id: &str, tag: &str) -> SharedControl {
        let state = Rc::new(RefCell::new(ControlState {
            tag: tag.to_string(),
            ..ControlState::default()
        }));
        self.controls
            .borrow_mut()
            .insert(id.to_string(), Rc::clone(&state));
        state
    }

    pub fn add_with_text(&self, id: &str, tag: &str, text: &str) -> SharedControl {
        let state = self.add(id, tag);
        state.borrow_mut().text = text.to_string();
        state
    }

    /// Registers the main window plus command field and status pane used
    /// by `run_transaction`.
    pub fn add_main_window(&self) -> (SharedControl, SharedControl, SharedControl) {
        let window = self.add("wnd[0]", "GuiMainWindow");
        let okcode = self.add("wnd[0]/tbar[0]/okcd", "GuiOkCodeField");
        let pane = self.add("wnd[0]/sbar/pane[0]", "GuiStatusPane");
        (window, okcode, pane)
    }

    pub fn get(&self, id: &str) -> Option<SharedControl> {
        self.controls.borrow().get(id).cloned()
    }
}

struct MockElement {
    state: SharedControl,
}

impl GuiElement for MockElement {
    fn control_type(&self) -> String {
        self.state.borrow().tag.clone()
    }

    fn text(&self) -> Result<String> {
        Ok(self.state.borrow().text.clone())
    }

    fn set_text(&self, text: &str) -> Result<()> {
        self.state.borrow_mut().text = text.to_string();
        Ok(())
    }

    fn selected(&self) -> Result<bool> {
        Ok(self.state.borrow().selected)
    }

    fn set_selected(&self, selected: bool) -> Result<()> {
        self.state.borrow_mut().selected = selected;
        Ok(())
    }

    fn set_focus(&self) -> Result<()> {
        self.state.borrow_mut().focus_count += 1;
        Ok(())
    }

    fn press(&self) -> Result<()> {
        self.state.borrow_mut().press_count += 1;
        Ok(())
    }

    fn select(&self) -> Result<()> {
        self.state.borrow_mut().select_count += 1;
        Ok(())
    }

    fn set_value(&self, value: &str) -> Result<()> {
        self.state.borrow_mut().text = value.to_string();
        Ok(())
    }

    fn screen_position(&self) -> Result<(i64, i64)> {
        Ok(self.state.borrow().screen_position)
    }

    fn double_click_item(&self, item: &str, column: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .double_clicks
            .push((item.to_string(), column.to_string()));
        Ok(())
    }

    fn cell_value(&self, row: i64, column: &str) -> Result<Option<String>> {
        Ok(self
            .state
            .borrow()
            .cells
            .get(&(row, column.to_string()))
            .cloned())
    }

    fn modify_cell(&self, row: i64, column: &str, text: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let key = (row, column.to_string());
        if state.cells.contains_key(&key) {
            state.cells.insert(key, text.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn row_count(&self) -> Result<i64> {
        Ok(self.state.borrow().row_count)
    }

    fn scroll_position(&self) -> Result<i64> {
        Ok(self.state.borrow().scroll_position)
    }

    fn set_scroll_position(&self, position: i64) -> Result<()> {
        self.state.borrow_mut().scroll_position = position;
        Ok(())
    }

    fn select_column(&self, column: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        if state.columns.iter().any(|c| c == column) {
            state.selected_columns.push(column.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn set_selected_rows(&self, rows: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        if state.grid_rows_selectable {
            state.selected_rows = Some(rows.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn absolute_row(&self, row: i64) -> Result<Box<dyn GuiElement>> {
        let mut state = self.state.borrow_mut();
        let row_state = state
            .absolute_rows
            .entry(row)
            .or_insert_with(|| {
                Rc::new(RefCell::new(ControlState {
                    tag: "GuiTableRow".to_string(),
                    ..ControlState::default()
                }))
            });
        Ok(Box::new(MockElement {
            state: Rc::clone(row_state),
        }))
    }

    fn set_selected_node(&self, node: &str) -> Result<()> {
        self.state.borrow_mut().selected_node = Some(node.to_string());
        Ok(())
    }

    fn expand_node(&self, node: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.expandable {
            state.expanded_nodes.push(node.to_string());
            Ok(())
        } else {
            Err(anyhow!("node '{node}' cannot be expanded"))
        }
    }

    fn select_item(&self, item: &str, column: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .selected_items
            .push((item.to_string(), column.to_string()));
        Ok(())
    }

    fn click_link(&self, item: &str, column: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .clicked_links
            .push((item.to_string(), column.to_string()));
        Ok(())
    }

    fn press_node_button(&self, node: &str, button: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .node_buttons_pressed
            .push((node.to_string(), button.to_string()));
        Ok(())
    }

    fn supports_toolbar_button(&self) -> bool {
        self.state.borrow().has_toolbar_press
    }

    fn press_toolbar_button(&self, button: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        if state.toolbar_buttons.iter().any(|b| b == button) {
            state.toolbar_pressed.push(button.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn press_button(&self, button: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        if state.legacy_buttons.iter().any(|b| b == button) {
            state.legacy_pressed.push(button.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn supports_node_context_menu(&self) -> bool {
        self.state.borrow().has_node_context_menu
    }

    fn node_context_menu(&self, node: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .context_menu_opened
            .push(format!("node:{node}"));
        Ok(())
    }

    fn supports_context_button(&self) -> bool {
        self.state.borrow().has_context_button
    }

    fn press_context_button(&self, button: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .context_menu_opened
            .push(format!("button:{button}"));
        Ok(())
    }

    fn select_context_menu_item(&self, item: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .context_items_selected
            .push(item.to_string());
        Ok(())
    }

    fn send_vkey(&self, code: u16) -> Result<()> {
        self.state.borrow_mut().vkeys_sent.push(code);
        Ok(())
    }

    fn maximize(&self) -> Result<()> {
        self.state.borrow_mut().maximize_count += 1;
        Ok(())
    }
}

struct MockSession {
    gui: MockGui,
}

impl GuiSession for MockSession {
    fn find_by_id(&self, id: &str) -> Result<Option<Box<dyn GuiElement>>> {
        Ok(self
            .gui
            .get(id)
            .map(|state| Box::new(MockElement { state }) as Box<dyn GuiElement>))
    }
}

pub struct MockConnection {
    pub description: String,
    pub gui: MockGui,
}

impl GuiConnection for MockConnection {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn sessions(&self) -> Result<Vec<Box<dyn GuiSession>>> {
        Ok(vec![Box::new(MockSession {
            gui: self.gui.clone(),
        })])
    }
}

pub struct MockRoot {
    pub can_open: bool,
    pub existing_description: Option<String>,
    pub gui: MockGui,
}

impl ScriptingRoot for MockRoot {
    fn supports_open_connection(&self) -> bool {
        self.can_open
    }

    fn open_connection(&self, name: &str) -> Result<Box<dyn GuiConnection>> {
        Ok(Box::new(MockConnection {
            description: name.to_string(),
            gui: self.gui.clone(),
        }))
    }

    fn connections(&self) -> Result<Vec<Box<dyn GuiConnection>>> {
        Ok(self
            .existing_description
            .iter()
            .map(|description| {
                Box::new(MockConnection {
                    description: description.clone(),
                    gui: self.gui.clone(),
                }) as Box<dyn GuiConnection>
            })
            .collect())
    }
}

pub struct MockLocator {
    pub root: Option<MockRoot>,
}

impl RootLocator for MockLocator {
    fn find_running_root(&self) -> Result<Option<Box<dyn ScriptingRoot>>> {
        Ok(self.root.as_ref().map(|root| {
            Box::new(MockRoot {
                can_open: root.can_open,
                existing_description: root.existing_description.clone(),
                gui: root.gui.clone(),
            }) as Box<dyn ScriptingRoot>
        }))
    }
}

pub fn locator_for(gui: &MockGui) -> MockLocator {
    MockLocator {
        root: Some(MockRoot {
            can_open: true,
            existing_description: None,
            gui: gui.clone(),
        }),
    }
}

/// Screenshot sink that records capture names instead of touching the
/// screen.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub captures: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture_count(&self) -> usize {
        self.captures.borrow().len()
    }
}

impl ScreenshotSink for RecordingSink {
    fn capture(&self, name: &str) -> Result<PathBuf> {
        self.captures.borrow_mut().push(name.to_string());
        Ok(PathBuf::from(format!("/tmp/{name}.png")))
    }
}

/// A driver already connected and sessioned against the given mock tree,
/// plus the sink recording its failure screenshots.
pub fn sessioned_driver(gui: &MockGui) -> (SapGuiDriver, RecordingSink) {
    init_logging();
    let sink = RecordingSink::new();
    let mut driver = SapGuiDriver::with_sink(DriverConfig::default(), Box::new(sink.clone()));
    driver.connect_to_session(&locator_for(gui)).unwrap();
    driver.open_connection("MOCK [test]").unwrap();
    (driver, sink)
}
