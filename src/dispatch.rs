//! Control-type dispatch and value coercion.
//!
//! Every keyword that touches an element funnels through this module:
//! given a resolved handle and its [`ControlType`], one exhaustive match
//! per action family decides which engine operation is legal and how the
//! control's value is encoded. Keeping the legality rules in one place
//! gives every "wrong control for this action" case the same error shape.

use crate::backend::GuiElement;
use crate::control::ControlType;
use crate::error::{AssertionKind, Result, SapError};

fn unsupported(action: &'static str, control_type: &ControlType) -> SapError {
    SapError::UnsupportedAction {
        action,
        control_type: control_type.to_string(),
    }
}

/// Single click. Tabs and menus are selected, buttons are pressed; no
/// other control type has a click semantic (checkboxes and combo boxes
/// have their own keywords).
pub fn click(element: &dyn GuiElement, control_type: &ControlType) -> Result<()> {
    match control_type {
        ControlType::Tab | ControlType::Menu => Ok(element.select()?),
        ControlType::Button => Ok(element.press()?),
        ControlType::TextField
        | ControlType::CTextField
        | ControlType::PasswordField
        | ControlType::Label
        | ControlType::Titlebar
        | ControlType::Statusbar
        | ControlType::StatusPane
        | ControlType::CheckBox
        | ControlType::RadioButton
        | ControlType::ComboBox
        | ControlType::Shell
        | ControlType::TableControl
        | ControlType::Other(_) => Err(unsupported("click_element", control_type)),
    }
}

/// Double click on a shell item. The item and column sub-identifiers are
/// forwarded to the engine unchanged.
pub fn double_click(
    element: &dyn GuiElement,
    control_type: &ControlType,
    item: &str,
    column: &str,
) -> Result<()> {
    match control_type {
        ControlType::Shell => Ok(element.double_click_item(item, column)?),
        _ => Err(unsupported("doubleclick_element", control_type)),
    }
}

/// Moves input focus to the element. Status panes are the one readable
/// type that must not be focused.
pub fn focus(element: &dyn GuiElement, control_type: &ControlType) -> Result<()> {
    match control_type {
        ControlType::StatusPane => Ok(()),
        _ => Ok(element.set_focus()?),
    }
}

/// Reads the element's value in its per-type encoding:
///
/// | control type            | value                                  |
/// |-------------------------|----------------------------------------|
/// | text fields, labels,    | raw text, after taking focus           |
/// | bars, buttons, tabs,    |                                        |
/// | shells                  |                                        |
/// | status pane             | raw text, without taking focus         |
/// | checkbox, radio button  | `checked` / `unchecked`                |
/// | combo box               | text with surrounding whitespace cut   |
pub fn read_value(element: &dyn GuiElement, control_type: &ControlType) -> Result<String> {
    match control_type {
        ControlType::TextField
        | ControlType::CTextField
        | ControlType::PasswordField
        | ControlType::Label
        | ControlType::Titlebar
        | ControlType::Statusbar
        | ControlType::Button
        | ControlType::Tab
        | ControlType::Shell => {
            element.set_focus()?;
            Ok(element.text()?)
        }
        ControlType::StatusPane => Ok(element.text()?),
        ControlType::CheckBox | ControlType::RadioButton => {
            // Closed vocabulary derived from the boolean state, never the
            // raw boolean itself.
            Ok(if element.selected()? {
                "checked".to_string()
            } else {
                "unchecked".to_string()
            })
        }
        // The engine pads combo box values with trailing spaces.
        ControlType::ComboBox => Ok(element.text()?.trim().to_string()),
        ControlType::Menu | ControlType::TableControl | ControlType::Other(_) => {
            Err(unsupported("get_value", control_type))
        }
    }
}

/// Reads the element's value and compares it against `expected`.
///
/// Checkbox and radio button expectations must themselves be `checked` or
/// `unchecked` (case-insensitive); anything else is an input error rather
/// than a mismatch. Status panes support equality but not containment.
pub fn check_value(
    element: &dyn GuiElement,
    control_type: &ControlType,
    id: &str,
    expected: &str,
    kind: AssertionKind,
) -> Result<()> {
    let action = match kind {
        AssertionKind::Equals => "element_value_should_be",
        AssertionKind::Contains => "element_value_should_contain",
    };

    match control_type {
        ControlType::TextField
        | ControlType::CTextField
        | ControlType::ComboBox
        | ControlType::Label => {
            let actual = read_value(element, control_type)?;
            let matched = match kind {
                AssertionKind::Equals => actual == expected,
                AssertionKind::Contains => actual.contains(expected),
            };
            if matched {
                Ok(())
            } else {
                Err(mismatch(id, expected, actual, kind))
            }
        }
        // Containment is only defined for the focusable text family.
        ControlType::StatusPane => match kind {
            AssertionKind::Equals => {
                let actual = read_value(element, control_type)?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(mismatch(id, expected, actual, kind))
                }
            }
            AssertionKind::Contains => Err(unsupported(action, control_type)),
        },
        ControlType::CheckBox | ControlType::RadioButton => {
            if kind == AssertionKind::Contains {
                return Err(unsupported(action, control_type));
            }
            let wanted = expected.to_lowercase();
            if wanted != "checked" && wanted != "unchecked" {
                return Err(SapError::InvalidExpectedValue {
                    control_type: control_type.to_string(),
                    value: expected.to_string(),
                });
            }
            let actual = read_value(element, control_type)?;
            if actual == wanted {
                Ok(())
            } else {
                Err(mismatch(id, &wanted, actual, kind))
            }
        }
        ControlType::PasswordField
        | ControlType::Titlebar
        | ControlType::Statusbar
        | ControlType::Button
        | ControlType::Tab
        | ControlType::Menu
        | ControlType::Shell
        | ControlType::TableControl
        | ControlType::Other(_) => Err(unsupported(action, control_type)),
    }
}

fn mismatch(id: &str, expected: &str, actual: String, kind: AssertionKind) -> SapError {
    SapError::AssertionMismatch {
        id: id.to_string(),
        expected: expected.to_string(),
        actual,
        kind,
    }
}

/// Writes text into an editable field. Shells are included because grid
/// search fields and custom controls take text through the same property.
pub fn write_text(
    element: &dyn GuiElement,
    control_type: &ControlType,
    action: &'static str,
    text: &str,
) -> Result<()> {
    match control_type {
        ControlType::TextField
        | ControlType::CTextField
        | ControlType::PasswordField
        | ControlType::Shell => Ok(element.set_text(text)?),
        _ => Err(unsupported(action, control_type)),
    }
}

/// Sets a checkbox's state. Selecting an already-selected checkbox (or
/// unselecting an unselected one) is a no-op, not an error.
pub fn set_checkbox(
    element: &dyn GuiElement,
    control_type: &ControlType,
    action: &'static str,
    selected: bool,
) -> Result<()> {
    match control_type {
        ControlType::CheckBox => Ok(element.set_selected(selected)?),
        _ => Err(unsupported(action, control_type)),
    }
}

pub fn select_radio_button(element: &dyn GuiElement, control_type: &ControlType) -> Result<()> {
    match control_type {
        ControlType::RadioButton => Ok(element.set_selected(true)?),
        _ => Err(unsupported("select_radio_button", control_type)),
    }
}

/// Selects a combo box option by its visible label.
pub fn select_combo_option(
    element: &dyn GuiElement,
    control_type: &ControlType,
    value: &str,
) -> Result<()> {
    match control_type {
        ControlType::ComboBox => Ok(element.set_value(value)?),
        _ => Err(unsupported("select_from_list_by_label", control_type)),
    }
}

/// Selects an entire table row. Table controls address rows through an
/// absolute row object; grid shells take a selected-rows property.
pub fn select_table_row(
    element: &dyn GuiElement,
    control_type: &ControlType,
    row: i64,
) -> Result<()> {
    match control_type {
        ControlType::TableControl => {
            let row_handle = element.absolute_row(row)?;
            Ok(row_handle.set_selected(true)?)
        }
        ControlType::Shell => {
            if element.set_selected_rows(&row.to_string())? {
                Ok(())
            } else {
                Err(unsupported("select_table_row", control_type))
            }
        }
        _ => Err(unsupported("select_table_row", control_type)),
    }
}
