// SelVault - Tampons de selection du systeme (Linux)
//
// Implementation de `SelectionBackend` au-dessus d'arboard, qui sait lire
// et ecrire PRIMARY et CLIPBOARD sous X11 (et Wayland avec le protocole
// data-control).
//
// Le handle arboard est cree a la premiere utilisation puis conserve :
// sous X11, c'est lui qui sert le contenu ecrit aux autres applications.
//
// # Etat du pointeur
// arboard ne donne pas l'etat des boutons : `pointer_held` interroge le
// serveur X (QueryPointer via x11rb) sur sa propre connexion, ouverte a
// la premiere utilisation. Bouton 1 ou Shift enfonce = selection en cours.
// Sans serveur X joignable, `pointer_held` repond false.
//
// # Limites
// - Vider un tampon revient a y ecrire un texte vide.

use crate::clipboard::backend::{SelectionBackend, SelectionKind};
use crate::error::{SvError, SvResult};
use arboard::{Clipboard, GetExtLinux, LinuxClipboardKind, SetExtLinux};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, KeyButMask, Window};
use x11rb::rust_connection::RustConnection;

fn linux_kind(kind: SelectionKind) -> LinuxClipboardKind {
    match kind {
        SelectionKind::Primary => LinuxClipboardKind::Primary,
        SelectionKind::Clipboard => LinuxClipboardKind::Clipboard,
    }
}

fn selection_error(kind: SelectionKind, e: arboard::Error) -> SvError {
    SvError::Selection(format!("{kind}: {e}"))
}

/// Retourne true si le masque X signale une selection a la souris en cours.
fn mask_holds_selection(mask: u16) -> bool {
    mask & u16::from(KeyButMask::BUTTON1 | KeyButMask::SHIFT) != 0
}

/// Connexion X dediee a la lecture de l'etat du pointeur.
struct PointerQuery {
    conn: RustConnection,
    root: Window,
}

impl PointerQuery {
    fn connect() -> Option<Self> {
        let (conn, screen) = match x11rb::connect(None) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!("no X display for pointer state: {e}");
                return None;
            }
        };
        let root = conn.setup().roots.get(screen)?.root;
        Some(Self { conn, root })
    }

    fn mask(&self) -> Option<u16> {
        let reply = self.conn.query_pointer(self.root).ok()?.reply().ok()?;
        Some(u16::from(reply.mask))
    }
}

#[derive(Default)]
enum PointerState {
    #[default]
    NotConnected,
    Ready(PointerQuery),
    Unavailable,
}

/// Tampons PRIMARY et CLIPBOARD du serveur d'affichage.
#[derive(Default)]
pub struct SystemSelections {
    inner: Option<Clipboard>,
    pointer: PointerState,
}

impl SystemSelections {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self) -> SvResult<&mut Clipboard> {
        if self.inner.is_none() {
            let clipboard = Clipboard::new().map_err(|e| SvError::Selection(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| SvError::Selection("clipboard unavailable".into()))
    }
}

impl SelectionBackend for SystemSelections {
    fn read_text(&mut self, kind: SelectionKind) -> SvResult<Option<Vec<u8>>> {
        let clipboard = self.ensure()?;
        match clipboard.get().clipboard(linux_kind(kind)).text() {
            Ok(text) => Ok(Some(text.into_bytes())),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(selection_error(kind, e)),
        }
    }

    fn write_text(&mut self, kind: SelectionKind, text: &str) -> SvResult<()> {
        let clipboard = self.ensure()?;
        clipboard
            .set()
            .clipboard(linux_kind(kind))
            .text(text.to_string())
            .map_err(|e| selection_error(kind, e))
    }

    fn has_other_content(&mut self, kind: SelectionKind) -> bool {
        match self.ensure() {
            Ok(clipboard) => clipboard.get().clipboard(linux_kind(kind)).image().is_ok(),
            Err(_) => false,
        }
    }

    fn pointer_held(&mut self) -> bool {
        if matches!(self.pointer, PointerState::NotConnected) {
            self.pointer = PointerQuery::connect().map_or(PointerState::Unavailable, PointerState::Ready);
        }
        let PointerState::Ready(query) = &self.pointer else {
            return false;
        };
        match query.mask() {
            Some(mask) => mask_holds_selection(mask),
            None => {
                tracing::debug!("pointer query failed, reconnecting on next check");
                self.pointer = PointerState::NotConnected;
                false
            }
        }
    }
}
