//! Build script for dupe-sidecar
//!
//! - Windows: Embeds the application manifest for long path support (>260 chars)
//!
//! # Windows Long Path Support
//!
//! Sidecar paths are the survivor's full path plus an extension, so they hit
//! the 260 character MAX_PATH limit before the files they describe do. The
//! manifest (`dupe-sidecar.manifest`) sets `longPathAware=true`, which together
//! with the Windows 10 v1607+ registry setting allows paths up to 32,767
//! characters.

fn main() {
    #[cfg(windows)]
    {
        // The .rc file references the manifest as an RT_MANIFEST resource
        embed_resource::compile("dupe-sidecar.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=dupe-sidecar.rc");
        println!("cargo:rerun-if-changed=dupe-sidecar.manifest");
    }
}
