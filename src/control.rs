use serde::{Deserialize, Serialize};

/// Control classification reported by the scripting engine for a resolved
/// element. Drives which operations are legal for the element; every
/// action family in [`crate::dispatch`] matches exhaustively over this
/// enum so a newly added variant surfaces as a compile error there.
///
/// The tag is discovered fresh per handle and never cached: the same
/// identifier may resolve to a different control type once the screen
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    TextField,
    /// Text field with an attached value help ("C" text field).
    CTextField,
    PasswordField,
    Label,
    Titlebar,
    Statusbar,
    /// Single pane of the status bar. Read without taking focus.
    StatusPane,
    Button,
    Tab,
    Menu,
    CheckBox,
    RadioButton,
    ComboBox,
    /// Container control (grids, trees, toolbars, custom controls).
    Shell,
    TableControl,
    /// Any tag this driver does not model; carries the raw tag string.
    Other(String),
}

impl ControlType {
    /// Maps the engine's raw type tag to a variant.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "GuiTextField" => ControlType::TextField,
            "GuiCTextField" => ControlType::CTextField,
            "GuiPasswordField" => ControlType::PasswordField,
            "GuiLabel" => ControlType::Label,
            "GuiTitlebar" => ControlType::Titlebar,
            "GuiStatusbar" => ControlType::Statusbar,
            "GuiStatusPane" => ControlType::StatusPane,
            "GuiButton" => ControlType::Button,
            "GuiTab" => ControlType::Tab,
            "GuiMenu" => ControlType::Menu,
            "GuiCheckBox" => ControlType::CheckBox,
            "GuiRadioButton" => ControlType::RadioButton,
            "GuiComboBox" => ControlType::ComboBox,
            "GuiShell" => ControlType::Shell,
            "GuiTableControl" => ControlType::TableControl,
            other => ControlType::Other(other.to_string()),
        }
    }

    /// The engine-side tag, used verbatim in error messages.
    pub fn tag(&self) -> &str {
        match self {
            ControlType::TextField => "GuiTextField",
            ControlType::CTextField => "GuiCTextField",
            ControlType::PasswordField => "GuiPasswordField",
            ControlType::Label => "GuiLabel",
            ControlType::Titlebar => "GuiTitlebar",
            ControlType::Statusbar => "GuiStatusbar",
            ControlType::StatusPane => "GuiStatusPane",
            ControlType::Button => "GuiButton",
            ControlType::Tab => "GuiTab",
            ControlType::Menu => "GuiMenu",
            ControlType::CheckBox => "GuiCheckBox",
            ControlType::RadioButton => "GuiRadioButton",
            ControlType::ComboBox => "GuiComboBox",
            ControlType::Shell => "GuiShell",
            ControlType::TableControl => "GuiTableControl",
            ControlType::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
