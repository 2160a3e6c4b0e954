//! Boundary traits for the SAP GUI scripting engine.
//!
//! Everything the driver knows about the running GUI goes through these
//! traits: locating the scripting root, opening connections, resolving
//! elements by id, and the per-control property surface. A production
//! backend wraps the COM automation objects; tests plug in an in-memory
//! tree.

use anyhow::{anyhow, Result};

/// Locates the running scripting engine. One scan pass, no retries; a
/// missing root means the login pad is not running.
pub trait RootLocator {
    fn find_running_root(&self) -> Result<Option<Box<dyn ScriptingRoot>>>;
}

/// The scripting engine's top-level automation object.
pub trait ScriptingRoot {
    /// Whether this root can open new connections. A root without this
    /// capability indicates the login pad is not actually available.
    fn supports_open_connection(&self) -> bool;

    /// Opens a new connection by its configured name (synchronously).
    fn open_connection(&self, name: &str) -> Result<Box<dyn GuiConnection>>;

    /// Currently open connections, in engine order.
    fn connections(&self) -> Result<Vec<Box<dyn GuiConnection>>>;
}

/// One open connection, owning an ordered set of sessions.
pub trait GuiConnection {
    fn description(&self) -> String;

    fn sessions(&self) -> Result<Vec<Box<dyn GuiSession>>>;
}

/// One logical user session (window set) within a connection.
pub trait GuiSession {
    /// Resolves a hierarchical element id against the live window tree.
    /// `Ok(None)` is the distinguishable not-found condition; `Err` is a
    /// transport-level failure.
    fn find_by_id(&self, id: &str) -> Result<Option<Box<dyn GuiElement>>>;
}

fn unavailable(operation: &str) -> anyhow::Error {
    anyhow!("element does not expose '{operation}'")
}

/// A transient handle to one control in the live tree, valid only for the
/// operation that resolved it.
///
/// Only `control_type` is mandatory. The rest of the surface carries
/// defaults that report the operation as unavailable, so a backend (or a
/// test double) implements just the operations its control actually
/// supports. Legality by control type is decided in [`crate::dispatch`]
/// before any of these are called; the defaults only fire when the engine
/// misreports a control's type.
#[allow(unused_variables)]
pub trait GuiElement {
    /// Raw engine type tag, e.g. `GuiTextField`.
    fn control_type(&self) -> String;

    fn text(&self) -> Result<String> {
        Err(unavailable("text"))
    }

    fn set_text(&self, text: &str) -> Result<()> {
        Err(unavailable("text="))
    }

    /// Selected state of checkboxes and radio buttons.
    fn selected(&self) -> Result<bool> {
        Err(unavailable("selected"))
    }

    /// Setting an already-held state is a no-op on the engine side.
    fn set_selected(&self, selected: bool) -> Result<()> {
        Err(unavailable("selected="))
    }

    fn set_focus(&self) -> Result<()> {
        Err(unavailable("setFocus"))
    }

    /// Button press.
    fn press(&self) -> Result<()> {
        Err(unavailable("press"))
    }

    /// Tab / menu selection.
    fn select(&self) -> Result<()> {
        Err(unavailable("select"))
    }

    /// Combo box option selection by visible label.
    fn set_value(&self, value: &str) -> Result<()> {
        Err(unavailable("value="))
    }

    /// Screen coordinates of the element's top-left corner.
    fn screen_position(&self) -> Result<(i64, i64)> {
        Err(unavailable("screenLeft/screenTop"))
    }

    // ============ Shell / grid surface ============

    fn double_click_item(&self, item: &str, column: &str) -> Result<()> {
        Err(unavailable("doubleClickItem"))
    }

    fn cell_value(&self, row: i64, column: &str) -> Result<Option<String>> {
        Err(unavailable("getCellValue"))
    }

    fn modify_cell(&self, row: i64, column: &str, text: &str) -> Result<bool> {
        Err(unavailable("modifyCell"))
    }

    fn row_count(&self) -> Result<i64> {
        Err(unavailable("rowCount"))
    }

    fn scroll_position(&self) -> Result<i64> {
        Err(unavailable("verticalScrollbar.position"))
    }

    fn set_scroll_position(&self, position: i64) -> Result<()> {
        Err(unavailable("verticalScrollbar.position="))
    }

    /// `Ok(false)` when the column id does not exist in the grid.
    fn select_column(&self, column: &str) -> Result<bool> {
        Err(unavailable("selectColumn"))
    }

    /// Grid-style row selection. `Ok(false)` when rejected by the control.
    fn set_selected_rows(&self, rows: &str) -> Result<bool> {
        Err(unavailable("selectedRows="))
    }

    /// Table-control row access; the returned row exposes `set_selected`.
    fn absolute_row(&self, row: i64) -> Result<Box<dyn GuiElement>> {
        Err(unavailable("getAbsoluteRow"))
    }

    // ============ Tree surface ============

    fn set_selected_node(&self, node: &str) -> Result<()> {
        Err(unavailable("selectedNode="))
    }

    fn expand_node(&self, node: &str) -> Result<()> {
        Err(unavailable("expandNode"))
    }

    fn select_item(&self, item: &str, column: &str) -> Result<()> {
        Err(unavailable("selectItem"))
    }

    fn click_link(&self, item: &str, column: &str) -> Result<()> {
        Err(unavailable("clickLink"))
    }

    fn press_node_button(&self, node: &str, button: &str) -> Result<()> {
        Err(unavailable("pressButton(node, button)"))
    }

    // ============ Toolbar / context menu surface ============

    /// Whether the control exposes the grid toolbar press.
    fn supports_toolbar_button(&self) -> bool {
        false
    }

    /// `Ok(false)` when the button id does not exist.
    fn press_toolbar_button(&self, button: &str) -> Result<bool> {
        Err(unavailable("pressToolbarButton"))
    }

    /// Legacy plain button press used by older shells. `Ok(false)` when
    /// the button id does not exist.
    fn press_button(&self, button: &str) -> Result<bool> {
        Err(unavailable("pressButton"))
    }

    fn supports_node_context_menu(&self) -> bool {
        false
    }

    fn node_context_menu(&self, node: &str) -> Result<()> {
        Err(unavailable("nodeContextMenu"))
    }

    fn supports_context_button(&self) -> bool {
        false
    }

    fn press_context_button(&self, button: &str) -> Result<()> {
        Err(unavailable("pressContextButton"))
    }

    fn select_context_menu_item(&self, item: &str) -> Result<()> {
        Err(unavailable("selectContextMenuItem"))
    }

    // ============ Window surface ============

    fn send_vkey(&self, code: u16) -> Result<()> {
        Err(unavailable("sendVKey"))
    }

    fn maximize(&self) -> Result<()> {
        Err(unavailable("maximize"))
    }
}
