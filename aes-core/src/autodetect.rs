//! Process-wide CPU capability probe.
//!
//! `cpufeatures` runs CPUID once and caches the answer in a static; every
//! later call is a relaxed atomic load. Key setup reads this to decide
//! which backend a new cipher binds to; nothing ever re-probes.

cpufeatures::new!(aes_cpuid, "aes", "ssse3");

#[inline]
pub(crate) fn aesni_available() -> bool {
    aes_cpuid::get()
}
