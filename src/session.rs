//! Connection/session state machine.
//!
//! `Disconnected -> Connected(root) -> Sessioned(session)`. The machine
//! only moves forward: there is no modeled way back to `Disconnected`,
//! because the driver is a single-shot test runner that reconnects by
//! restarting the process.

use std::mem;

use crate::backend::{GuiSession, RootLocator, ScriptingRoot};
use crate::error::{Result, SapError};

pub(crate) enum SessionState {
    Disconnected,
    Connected {
        root: Box<dyn ScriptingRoot>,
    },
    Sessioned {
        root: Box<dyn ScriptingRoot>,
        session: Box<dyn GuiSession>,
    },
}

impl SessionState {
    pub(crate) fn new() -> Self {
        SessionState::Disconnected
    }

    /// `Disconnected -> Connected`. One scan pass, no retries; a root
    /// that cannot open connections means the login pad is not actually
    /// available.
    pub(crate) fn connect(&mut self, locator: &dyn RootLocator) -> Result<()> {
        let root = locator
            .find_running_root()?
            .ok_or_else(|| {
                SapError::ConnectionUnavailable(
                    "no running scripting engine found, is the login pad open?".to_string(),
                )
            })?;
        if !root.supports_open_connection() {
            return Err(SapError::ConnectionUnavailable(
                "scripting engine cannot open connections, is the login pad open?".to_string(),
            ));
        }
        *self = SessionState::Connected { root };
        Ok(())
    }

    /// `Connected -> Sessioned` by attaching to the first existing
    /// connection, rejecting when its description does not match.
    pub(crate) fn attach_existing(&mut self, connection_name: &str) -> Result<()> {
        let root = self.take_root()?;
        let result = (|| {
            let mut connections = root.connections()?;
            if connections.is_empty() {
                return Err(SapError::ConnectionUnavailable(
                    "no open connections found".to_string(),
                ));
            }
            let connection = connections.remove(0);
            if connection.description() != connection_name {
                return Err(SapError::ConnectionUnavailable(format!(
                    "no existing connection for '{connection_name}' found"
                )));
            }
            first_session(connection.sessions()?)
        })();
        self.restore(root, result)
    }

    /// `Connected -> Sessioned` by opening a new connection by name.
    pub(crate) fn open_connection(&mut self, connection_name: &str) -> Result<()> {
        let root = self.take_root()?;
        let result = (|| {
            let connection = root.open_connection(connection_name).map_err(|e| {
                SapError::ConnectionUnavailable(format!(
                    "cannot open connection '{connection_name}', please check the connection name: {e}"
                ))
            })?;
            first_session(connection.sessions()?)
        })();
        self.restore(root, result)
    }

    /// The active session, or the setup error telling the caller to
    /// connect first.
    pub(crate) fn session(&self) -> Result<&dyn GuiSession> {
        match self {
            SessionState::Sessioned { session, .. } => Ok(session.as_ref()),
            SessionState::Disconnected | SessionState::Connected { .. } => {
                Err(SapError::ConnectionUnavailable(
                    "no active session, connect to a session first".to_string(),
                ))
            }
        }
    }

    fn take_root(&mut self) -> Result<Box<dyn ScriptingRoot>> {
        match mem::replace(self, SessionState::Disconnected) {
            SessionState::Disconnected => Err(SapError::ConnectionUnavailable(
                "not connected to a scripting engine, connect to a session first".to_string(),
            )),
            SessionState::Connected { root } | SessionState::Sessioned { root, .. } => Ok(root),
        }
    }

    fn restore(
        &mut self,
        root: Box<dyn ScriptingRoot>,
        result: Result<Box<dyn GuiSession>>,
    ) -> Result<()> {
        match result {
            Ok(session) => {
                *self = SessionState::Sessioned { root, session };
                Ok(())
            }
            Err(e) => {
                *self = SessionState::Connected { root };
                Err(e)
            }
        }
    }
}

fn first_session(mut sessions: Vec<Box<dyn GuiSession>>) -> Result<Box<dyn GuiSession>> {
    if sessions.is_empty() {
        return Err(SapError::ConnectionUnavailable(
            "connection has no sessions".to_string(),
        ));
    }
    Ok(sessions.remove(0))
}
