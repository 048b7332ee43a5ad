//! Buffer broker: the engine's only coupling to a GPU API.
//!
//! The embedder supplies two callbacks — request and destroy — and the engine
//! funnels every vertex/index upload through them. Swapping rendering
//! backends means swapping these two closures, nothing else.
//!
//! Request contract (implemented by the callback):
//! - `None` handle: create a buffer and upload `data`
//! - `Some` handle, same size: update in place
//! - `Some` handle, different size: destroy + create
//!
//! The broker itself short-circuits zero-size requests, returning the input
//! handle untouched.

use std::fmt;
use std::num::NonZeroU64;

/// Which GPU buffer a request targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Opaque handle minted by the embedder's request callback.
///
/// The engine never interprets the value; it only hands it back on updates
/// and destruction. Zero is reserved as "no buffer", hence the non-zero inner
/// type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(NonZeroU64);

impl BufferHandle {
    #[inline]
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

/// Per-path bundle of GPU buffer handles, as handed to the backend at draw
/// time.
///
/// Tessellation mode populates `vertex`/`index`; stencil-to-cover
/// additionally populates the cover pair.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawBuffers {
    pub vertex: Option<BufferHandle>,
    pub index: Option<BufferHandle>,
    pub cover_vertex: Option<BufferHandle>,
    pub cover_index: Option<BufferHandle>,
}

pub type RequestBufferFn =
    Box<dyn FnMut(Option<BufferHandle>, BufferKind, &[u8]) -> Option<BufferHandle>>;
pub type DestroyBufferFn = Box<dyn FnMut(BufferHandle)>;

/// Holds the embedder-supplied callbacks.
///
/// With no callbacks installed, requests return `None` (draw events are still
/// emitted; the backend skips draws whose buffers are missing) and a one-time
/// warning is logged.
#[derive(Default)]
pub struct BufferBroker {
    request: Option<RequestBufferFn>,
    destroy: Option<DestroyBufferFn>,
    warned_missing: bool,
}

impl BufferBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callbacks(&mut self, request: RequestBufferFn, destroy: DestroyBufferFn) {
        self.request = Some(request);
        self.destroy = Some(destroy);
        self.warned_missing = false;
    }

    pub(crate) fn request(
        &mut self,
        handle: Option<BufferHandle>,
        kind: BufferKind,
        data: &[u8],
    ) -> Option<BufferHandle> {
        if data.is_empty() {
            return handle;
        }
        match &mut self.request {
            Some(cb) => cb(handle, kind, data),
            None => {
                if !self.warned_missing {
                    log::warn!("buffer callbacks not installed; geometry uploads are dropped");
                    self.warned_missing = true;
                }
                None
            }
        }
    }

    pub(crate) fn destroy(&mut self, handle: Option<BufferHandle>) {
        if let (Some(h), Some(cb)) = (handle, &mut self.destroy) {
            cb(h);
        }
    }
}

impl fmt::Debug for BufferBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferBroker")
            .field("installed", &self.request.is_some())
            .finish()
    }
}
