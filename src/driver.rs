//! Keyword surface of the driver.
//!
//! `SapGuiDriver` composes the element resolver, the type dispatcher, and
//! the session state machine into the flat set of actions a test script
//! calls. Every keyword resolves its element fresh (the live tree may
//! have changed since the last call), dispatches by control type, then
//! sleeps for the configured settle-delay. User-facing failures capture a
//! screenshot before surfacing; setup failures do not.

use std::thread;

use crate::backend::{GuiElement, RootLocator};
use crate::config::{parse_wait, DriverConfig};
use crate::control::ControlType;
use crate::dispatch;
use crate::error::{AssertionKind, Result, SapError};
use crate::screenshot::{ScreenCapture, ScreenshotSink};
use crate::session::SessionState;
use crate::vkey::resolve_vkey;

/// Well-known command field of the main window.
const OKCODE_FIELD: &str = "wnd[0]/tbar[0]/okcd";
/// Well-known first status-bar pane of the main window.
const STATUS_PANE: &str = "wnd[0]/sbar/pane[0]";
/// Log-off navigation clears the status line; checking it afterwards
/// would false-positive.
const LOG_OFF_TRANSACTION: &str = "/nex";

/// "Transaction does not exist" status-line sentinels, one per supported
/// GUI language (Dutch, English, German).
fn unknown_transaction_sentinels(transaction: &str) -> [String; 3] {
    let upper = transaction.to_uppercase();
    [
        format!("Transactie {upper} bestaat niet"),
        format!("Transaction {upper} does not exist"),
        format!("Transaktion {upper} existiert nicht"),
    ]
}

pub struct SapGuiDriver {
    state: SessionState,
    config: DriverConfig,
    screenshots: Box<dyn ScreenshotSink>,
}

impl SapGuiDriver {
    /// Creates a driver with the default screen-capture sink.
    pub fn new(config: DriverConfig) -> Self {
        let sink = ScreenCapture::new(config.screenshot_directory.clone());
        Self::with_sink(config, Box::new(sink))
    }

    /// Creates a driver with a custom screenshot sink.
    pub fn with_sink(config: DriverConfig, screenshots: Box<dyn ScreenshotSink>) -> Self {
        Self {
            state: SessionState::new(),
            config,
            screenshots,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    // ============ Connection keywords ============

    /// Scans for the running scripting engine and connects to it. Fails
    /// without retrying when no engine (or no open login pad) is found.
    pub fn connect_to_session(&mut self, locator: &dyn RootLocator) -> Result<()> {
        self.state.connect(locator)?;
        self.settle();
        Ok(())
    }

    /// Opens a new connection by its full configured name and takes its
    /// first session.
    pub fn open_connection(&mut self, connection_name: &str) -> Result<()> {
        self.state.open_connection(connection_name)?;
        self.settle();
        Ok(())
    }

    /// Attaches to the first already-open connection, rejecting when its
    /// description does not match `connection_name`.
    pub fn connect_to_existing_connection(&mut self, connection_name: &str) -> Result<()> {
        self.state.attach_existing(connection_name)?;
        self.settle();
        Ok(())
    }

    // ============ Configuration keywords ============

    /// Sets the delay slept after each keyword. Accepts a bare number of
    /// seconds or a string like `3 seconds` or `500 ms`.
    pub fn set_explicit_wait(&mut self, wait: &str) -> Result<()> {
        self.config.explicit_wait = parse_wait(wait)?;
        Ok(())
    }

    pub fn enable_screenshots_on_error(&mut self) {
        self.config.screenshots_on_error = true;
    }

    pub fn disable_screenshots_on_error(&mut self) {
        self.config.screenshots_on_error = false;
    }

    // ============ Invocation keywords ============

    /// Single click. Only buttons, tabs and menu items are clickable; for
    /// checkboxes or dropdown lists use `select_checkbox` or
    /// `select_from_list_by_label` instead.
    pub fn click_element(&self, element_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::click(element.as_ref(), &control_type)
        })
    }

    /// Double click on a shell item, forwarding the item and column
    /// sub-identifiers unchanged.
    pub fn doubleclick_element(&self, element_id: &str, item_id: &str, column_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::double_click(element.as_ref(), &control_type, item_id, column_id)
        })
    }

    /// Clicks a toolbar button of a grid shell. Probes whether the shell
    /// exposes the toolbar press and uses the legacy plain press when it
    /// does not.
    pub fn click_toolbar_button(&self, table_id: &str, button_id: &str) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(table_id)?;
            let found = if element.supports_toolbar_button() {
                element.press_toolbar_button(button_id)?
            } else {
                element.press_button(button_id)?
            };
            if found {
                Ok(())
            } else {
                Err(SapError::ElementNotFound {
                    id: button_id.to_string(),
                })
            }
        })
    }

    // ============ Value-write keywords ============

    /// Inserts text into the field identified by `element_id`. Use
    /// `input_password` for values that must stay out of the log.
    pub fn input_text(&self, element_id: &str, text: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::write_text(element.as_ref(), &control_type, "input_text", text)?;
            tracing::info!("Typing text '{}' into text field '{}'.", text, element_id);
            Ok(())
        })
    }

    /// Inserts a password. The value itself is never logged.
    pub fn input_password(&self, element_id: &str, password: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::write_text(element.as_ref(), &control_type, "input_password", password)?;
            tracing::info!("Typing password into text field '{}'.", element_id);
            Ok(())
        })
    }

    /// Selects a checkbox. Does nothing if it is already selected.
    pub fn select_checkbox(&self, element_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::set_checkbox(element.as_ref(), &control_type, "select_checkbox", true)
        })
    }

    /// Removes a checkbox selection. Does nothing if it is not selected.
    pub fn unselect_checkbox(&self, element_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::set_checkbox(element.as_ref(), &control_type, "unselect_checkbox", false)
        })
    }

    pub fn select_radio_button(&self, element_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::select_radio_button(element.as_ref(), &control_type)
        })
    }

    /// Selects a combo box option by its visible label.
    pub fn select_from_list_by_label(&self, element_id: &str, value: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::select_combo_option(element.as_ref(), &control_type, value)
        })
    }

    /// Sets a grid cell value.
    pub fn set_cell_value(&self, table_id: &str, row: i64, column_id: &str, text: &str) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(table_id)?;
            if element.modify_cell(row, column_id, text)? {
                tracing::info!(
                    "Typing text '{}' into cell ({}, '{}').",
                    text,
                    row,
                    column_id
                );
                Ok(())
            } else {
                Err(SapError::ElementNotFound {
                    id: format!("{table_id} cell ({row}, '{column_id}')"),
                })
            }
        })
    }

    // ============ Value-read keywords ============

    /// Reads the element's value in its per-type encoding (see
    /// [`dispatch::read_value`]).
    pub fn get_value(&self, element_id: &str) -> Result<String> {
        self.guard(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::read_value(element.as_ref(), &control_type)
        })
    }

    /// Reads a grid cell value.
    pub fn get_cell_value(&self, table_id: &str, row: i64, column_id: &str) -> Result<String> {
        self.guard(|driver| {
            let element = driver.resolve(table_id)?;
            element
                .cell_value(row, column_id)?
                .ok_or_else(|| SapError::ElementNotFound {
                    id: format!("{table_id} cell ({row}, '{column_id}')"),
                })
        })
    }

    /// Number of rows in the given table.
    pub fn get_row_count(&self, table_id: &str) -> Result<i64> {
        self.guard(|driver| Ok(driver.resolve(table_id)?.row_count()?))
    }

    /// Title text of the given window locator.
    pub fn get_window_title(&self, locator: &str) -> Result<String> {
        self.guard(|driver| Ok(driver.resolve(locator)?.text()?))
    }

    /// Vertical scrollbar position of a shell element.
    pub fn get_scroll_position(&self, element_id: &str) -> Result<i64> {
        self.guard(|driver| Ok(driver.resolve(element_id)?.scroll_position()?))
    }

    /// Screen coordinates of the element's top-left corner.
    pub fn get_element_location(&self, element_id: &str) -> Result<(i64, i64)> {
        self.guard(|driver| Ok(driver.resolve(element_id)?.screen_position()?))
    }

    // ============ Scrolling / trees / menus ============

    /// Scrolls the vertical scrollbar of a shell element to `position`
    /// (given in rows).
    pub fn scroll(&self, element_id: &str, position: i64) -> Result<()> {
        self.run(|driver| Ok(driver.resolve(element_id)?.set_scroll_position(position)?))
    }

    /// Selects an entire row of a table control or grid shell. Rows are
    /// indexed from 0.
    pub fn select_table_row(&self, table_id: &str, row: i64) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(table_id)?;
            dispatch::select_table_row(element.as_ref(), &control_type, row)
        })
    }

    /// Selects an entire grid column by its id.
    pub fn select_table_column(&self, table_id: &str, column_id: &str) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(table_id)?;
            if element.select_column(column_id)? {
                Ok(())
            } else {
                Err(SapError::ElementNotFound {
                    id: column_id.to_string(),
                })
            }
        })
    }

    /// Selects a tree node. With `expand`, additionally tries to expand
    /// it; a node that cannot be expanded is not an error.
    pub fn select_node(&self, tree_id: &str, node_id: &str, expand: bool) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(tree_id)?;
            element.set_selected_node(node_id)?;
            if expand {
                if let Err(e) = element.expand_node(node_id) {
                    tracing::debug!("Node '{}' not expandable: {}", node_id, e);
                }
            }
            Ok(())
        })
    }

    /// Selects and clicks a link inside a tree.
    pub fn select_node_link(&self, tree_id: &str, link_id1: &str, link_id2: &str) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(tree_id)?;
            element.select_item(link_id1, link_id2)?;
            element.click_link(link_id1, link_id2)?;
            Ok(())
        })
    }

    /// Clicks a button embedded in a tree node.
    pub fn click_node_button(&self, tree_id: &str, node_id: &str, button_id: &str) -> Result<()> {
        self.run(|driver| {
            let element = driver.resolve(tree_id)?;
            element.press_node_button(node_id, button_id)?;
            Ok(())
        })
    }

    /// Opens a context menu (via the node context menu or a context
    /// button, whichever the control supports) and selects an item.
    pub fn select_context_menu_item(
        &self,
        element_id: &str,
        menu_or_button_id: &str,
        item_id: &str,
    ) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            if element.supports_node_context_menu() {
                element.node_context_menu(menu_or_button_id)?;
            } else if element.supports_context_button() {
                element.press_context_button(menu_or_button_id)?;
            } else {
                return Err(SapError::UnsupportedAction {
                    action: "select_context_menu_item",
                    control_type: control_type.to_string(),
                });
            }
            element.select_context_menu_item(item_id)?;
            Ok(())
        })
    }

    // ============ Navigation / window keywords ============

    /// Runs a transaction by typing its code into the command field and
    /// confirming. Raises [`SapError::UnknownTransaction`] when the
    /// status line reports the code as nonexistent in any supported GUI
    /// language. The log-off code `/nex` never inspects the status line.
    pub fn run_transaction(&self, transaction: &str) -> Result<()> {
        self.run(|driver| {
            driver.resolve(OKCODE_FIELD)?.set_text(transaction)?;
            Ok(())
        })?;
        self.send_vkey("0", 0)?;

        if transaction == LOG_OFF_TRANSACTION {
            return Ok(());
        }

        self.guard(|driver| {
            let pane_value = driver.resolve(STATUS_PANE)?.text()?;
            if unknown_transaction_sentinels(transaction)
                .iter()
                .any(|sentinel| *sentinel == pane_value)
            {
                return Err(SapError::UnknownTransaction(transaction.to_string()));
            }
            Ok(())
        })
    }

    /// Sends a virtual key to a window (not into an element). `vkey` is
    /// either a numeric code or a combination like `Ctrl + Shift + F1`.
    pub fn send_vkey(&self, vkey: &str, window: usize) -> Result<()> {
        let code = resolve_vkey(vkey)?;
        self.run(|driver| {
            let window_element = driver
                .session()?
                .find_by_id(&format!("wnd[{window}]"))
                .map_err(|_| SapError::WindowNotFound { window })?
                .ok_or(SapError::WindowNotFound { window })?;
            window_element
                .send_vkey(code)
                .map_err(|_| SapError::WindowNotFound { window })?;
            Ok(())
        })
    }

    /// Maximizes the given window.
    pub fn maximize_window(&self, window: usize) -> Result<()> {
        self.run(|driver| {
            let window_element = driver
                .session()?
                .find_by_id(&format!("wnd[{window}]"))
                .map_err(|_| SapError::WindowNotFound { window })?
                .ok_or(SapError::WindowNotFound { window })?;
            window_element
                .maximize()
                .map_err(|_| SapError::WindowNotFound { window })?;
            Ok(())
        })
    }

    /// Moves input focus to the element. Status panes never take focus.
    pub fn set_focus(&self, element_id: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::focus(element.as_ref(), &control_type)
        })
    }

    // ============ Assertion keywords ============

    /// Checks that the element resolves in the live tree.
    pub fn element_should_be_present(&self, element_id: &str) -> Result<()> {
        self.guard(|driver| {
            driver.resolve(element_id)?;
            Ok(())
        })
    }

    /// Checks the element value against `expected_value` with exact
    /// equality. Checkbox and radio button expectations must be
    /// `checked` or `unchecked` (case-insensitive).
    pub fn element_value_should_be(&self, element_id: &str, expected_value: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::check_value(
                element.as_ref(),
                &control_type,
                element_id,
                expected_value,
                AssertionKind::Equals,
            )
        })
    }

    /// Checks that the element value contains `expected_value`. Only
    /// defined for the focusable text family.
    pub fn element_value_should_contain(&self, element_id: &str, expected_value: &str) -> Result<()> {
        self.run(|driver| {
            let (element, control_type) = driver.resolve_typed(element_id)?;
            dispatch::check_value(
                element.as_ref(),
                &control_type,
                element_id,
                expected_value,
                AssertionKind::Contains,
            )
        })
    }

    // ============ Internals ============

    fn session(&self) -> Result<&dyn crate::backend::GuiSession> {
        self.state.session()
    }

    /// Resolves an element id against the live tree. Resolution failure
    /// is always [`SapError::ElementNotFound`], distinct from any
    /// wrong-type error raised later.
    fn resolve(&self, element_id: &str) -> Result<Box<dyn GuiElement>> {
        self.session()?
            .find_by_id(element_id)?
            .ok_or_else(|| SapError::ElementNotFound {
                id: element_id.to_string(),
            })
    }

    fn resolve_typed(&self, element_id: &str) -> Result<(Box<dyn GuiElement>, ControlType)> {
        let element = self.resolve(element_id)?;
        let control_type = ControlType::from_tag(&element.control_type());
        Ok((element, control_type))
    }

    /// Runs a state-mutating keyword body: screenshot policy on failure,
    /// settle-delay on success.
    fn run(&self, body: impl FnOnce(&Self) -> Result<()>) -> Result<()> {
        self.guard(body)?;
        self.settle();
        Ok(())
    }

    /// Applies the error policy to a keyword body: user-facing failures
    /// capture a best-effort screenshot first, setup failures pass
    /// through untouched.
    fn guard<T>(&self, body: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        match body(self) {
            Err(e) => {
                if error_is_user_facing(&e) {
                    self.screenshot_on_error();
                }
                Err(e)
            }
            ok => ok,
        }
    }

    fn screenshot_on_error(&self) {
        if !self.config.screenshots_on_error {
            return;
        }
        // Fire and forget: a failed capture must not mask the original
        // error.
        match self.screenshots.capture("sap-error") {
            Ok(path) => tracing::info!("Captured failure screenshot at {}.", path.display()),
            Err(e) => tracing::warn!("Failed to capture failure screenshot: {}", e),
        }
    }

    fn settle(&self) {
        if !self.config.explicit_wait.is_zero() {
            thread::sleep(self.config.explicit_wait);
        }
    }
}

/// Setup and configuration errors happen before any GUI is presumed
/// available, so they never trigger a screenshot.
fn error_is_user_facing(error: &SapError) -> bool {
    !matches!(
        error,
        SapError::ConnectionUnavailable(_) | SapError::InvalidWaitFormat(_)
    )
}
