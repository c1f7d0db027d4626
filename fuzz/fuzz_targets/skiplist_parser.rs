#![no_main]

use benchskip::skiplist::{LoadOptions, SkipList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Loading must either succeed or return an error, never panic
        if let Ok(skips) = SkipList::from_yaml_str(input, &LoadOptions::default()) {
            // Anything that loads must survive a serialize/reload cycle
            let yaml = skips.to_yaml_string().expect("loaded skip list must serialize");
            let reloaded = SkipList::from_yaml_str(&yaml, &LoadOptions::strict())
                .expect("serialized skip list must reload");
            assert_eq!(skips, reloaded);
        }
    }
});
