//! Android adapter: `ReactNativeRsModule.nativeExecute(String): String`.
//!
//! Java hands out modified UTF-8, which spells supplementary characters as
//! surrogate pairs. The command is decoded to standard UTF-8 before it reaches
//! the executor, and the result goes back through `NewString` conversion, so
//! emoji survive the round trip.

use std::ffi::{CStr, CString};

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use tracing::warn;

use crate::adapter::domain::{CommandView, HostRuntime};
use crate::adapter::host::HostModule;
use crate::adapter::mutf8::decode_modified_utf8;
use crate::api::ffi::FfiExecutor;

/// Command text copied out of the Java string.
pub struct JniCommandView {
    utf8: CString,
}

impl CommandView for JniCommandView {
    fn as_c_str(&self) -> &CStr {
        &self.utf8
    }
}

pub struct JniRuntime<'e, 'local> {
    env: &'e mut JNIEnv<'local>,
}

impl<'e, 'local> JniRuntime<'e, 'local> {
    pub fn new(env: &'e mut JNIEnv<'local>) -> Self {
        Self { env }
    }
}

impl<'e, 'local> HostRuntime for JniRuntime<'e, 'local> {
    type Command = JString<'local>;
    type Output = JString<'local>;
    type View<'a> = JniCommandView where Self: 'a;

    fn acquire<'a>(&'a mut self, command: &'a JString<'local>) -> Option<JniCommandView> {
        // The UTF chars are released when `chars` drops at the end of this scope.
        let chars = match self.env.get_string(command) {
            Ok(chars) => chars,
            Err(err) => {
                warn!("GetStringUTFChars failed: {err}");
                return None;
            }
        };
        let utf8 = decode_modified_utf8(chars.to_bytes())?;
        Some(JniCommandView { utf8 })
    }

    fn new_string(&mut self, result: &CStr) -> Option<JString<'local>> {
        match self.env.new_string(result.to_string_lossy()) {
            Ok(output) => Some(output),
            Err(err) => {
                warn!("NewString failed: {err}");
                None
            }
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_reactnativers_ReactNativeRsModule_nativeExecute<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    cmd: JString<'local>,
) -> jstring {
    let mut runtime = JniRuntime::new(&mut env);
    HostModule::new(&FfiExecutor)
        .native_execute(&mut runtime, &cmd)
        .map(JString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}
