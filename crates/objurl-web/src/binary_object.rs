use objurl_core::{Error, Identity, ObjectKey};
use std::cell::Cell;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, File, MediaSource};

thread_local! {
    // Weakly keyed, so that having an identity never keeps a blob alive
    static IDENTITIES: js_sys::WeakMap = js_sys::WeakMap::new();
    static NEXT_IDENTITY: Cell<u64> = const { Cell::new(1) };
}

/// Binary data an object URL can be created for
#[derive(Clone, Debug, PartialEq)]
pub enum BinaryObject {
    Blob(Blob),
    MediaSource(MediaSource),
}

impl BinaryObject {
    pub fn as_object(&self) -> &js_sys::Object {
        match self {
            BinaryObject::Blob(b) => b.unchecked_ref(),
            BinaryObject::MediaSource(m) => m.unchecked_ref(),
        }
    }
}

// Ids are never handed out twice, so an entry left behind by a dropped object cannot be mistaken for
// another object's
impl Identity for BinaryObject {
    type Guard = ();

    fn guard(&self) {}

    fn identity(&self) -> ObjectKey {
        let object = self.as_object();
        IDENTITIES.with(|ids| {
            // Ids stay well below 2^53, so they round-trip through f64 losslessly
            if let Some(id) = ids.get(object).as_f64() {
                return ObjectKey(id as u64);
            }
            let id = NEXT_IDENTITY.with(|next| {
                let id = next.get();
                next.set(id + 1);
                id
            });
            ids.set(object, &JsValue::from_f64(id as f64));
            ObjectKey(id)
        })
    }
}

impl From<Blob> for BinaryObject {
    fn from(blob: Blob) -> BinaryObject {
        BinaryObject::Blob(blob)
    }
}

impl From<File> for BinaryObject {
    fn from(file: File) -> BinaryObject {
        BinaryObject::Blob(file.into())
    }
}

impl From<MediaSource> for BinaryObject {
    fn from(source: MediaSource) -> BinaryObject {
        BinaryObject::MediaSource(source)
    }
}

impl TryFrom<JsValue> for BinaryObject {
    type Error = Error;

    fn try_from(value: JsValue) -> Result<BinaryObject, Error> {
        if value.is_null() || value.is_undefined() {
            return Err(Error::InvalidObject(format!("{value:?}")));
        }
        let value = match value.dyn_into::<Blob>() {
            Ok(blob) => return Ok(BinaryObject::Blob(blob)),
            Err(value) => value,
        };
        match value.dyn_into::<MediaSource>() {
            Ok(source) => Ok(BinaryObject::MediaSource(source)),
            Err(value) => Err(Error::InvalidObject(format!("{value:?}"))),
        }
    }
}
