//! Convenience macros for plugin development.

/// Exports an [`EditPlugin`](crate::traits::EditPlugin) from a `cdylib`.
///
/// Generates the `imagedit_plugin_descriptor` entry point the host looks
/// for. The expression is evaluated once, on first use.
///
/// # Example
/// ```rust,ignore
/// use imagedit_plugin::prelude::*;
///
/// #[derive(Debug)]
/// struct Invert;
///
/// impl EditPlugin for Invert {
///     fn name(&self) -> &str { "Invert" }
///     fn edit(&self, _input: &ImageRef<'_>, output: &mut ImageMut<'_>) -> Result<(), String> {
///         output.as_bytes_mut().iter_mut().for_each(|b| *b = 255 - *b);
///         Ok(())
///     }
/// }
///
/// export_plugin!(Invert);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($plugin:expr) => {
        fn __imagedit_plugin_instance() -> &'static dyn $crate::traits::EditPlugin {
            static INSTANCE: ::std::sync::OnceLock<
                ::std::boxed::Box<dyn $crate::traits::EditPlugin>,
            > = ::std::sync::OnceLock::new();
            INSTANCE
                .get_or_init(|| ::std::boxed::Box::new($plugin))
                .as_ref()
        }

        unsafe extern "C" fn __imagedit_plugin_name() -> *const ::std::os::raw::c_char {
            static NAME: ::std::sync::OnceLock<::std::ffi::CString> = ::std::sync::OnceLock::new();
            NAME.get_or_init(|| {
                $crate::ffi::safety::name_to_c_string(__imagedit_plugin_instance().name())
            })
            .as_ptr()
        }

        unsafe extern "C" fn __imagedit_plugin_edit(
            input: *const $crate::ffi::abi::FfiImage,
            output: *mut $crate::ffi::abi::FfiImage,
        ) -> i32 {
            unsafe { $crate::exports::invoke_edit(__imagedit_plugin_instance(), input, output) }
        }

        static __IMAGEDIT_PLUGIN_DESCRIPTOR: $crate::ffi::abi::FfiPluginDescriptor =
            $crate::ffi::abi::FfiPluginDescriptor {
                abi_version: $crate::ffi::abi::IMAGEDIT_ABI_VERSION,
                name: __imagedit_plugin_name,
                edit: __imagedit_plugin_edit,
                last_error: $crate::exports::last_error,
            };

        /// Plugin entry point resolved by the imagedit host.
        #[unsafe(no_mangle)]
        pub extern "C" fn imagedit_plugin_descriptor() -> *const $crate::ffi::abi::FfiPluginDescriptor
        {
            &__IMAGEDIT_PLUGIN_DESCRIPTOR
        }
    };
}
