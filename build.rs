use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FROGGER_GAME_SRC");

    // Host builds only carry the portable library and its tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    println!("cargo:rustc-link-arg=-mmcu=atmega324pa");
    println!("cargo:rustc-env=MCU_FREQ_HZ=8000000");

    if env::var("PROFILE").as_deref() == Ok("debug") {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }

    // Frog, lane and LED-matrix logic is the C game module
    match env::var("FROGGER_GAME_SRC") {
        Ok(dir) => {
            let dir = PathBuf::from(dir);
            let sources: Vec<PathBuf> = std::fs::read_dir(&dir)
                .expect("FROGGER_GAME_SRC is not readable")
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().map_or(false, |ext| ext == "c"))
                .collect();
            for source in &sources {
                println!("cargo:rerun-if-changed={}", source.display());
            }
            cc::Build::new()
                .compiler("avr-gcc")
                .flag("-mmcu=atmega324pa")
                .define("F_CPU", "8000000UL")
                .include(&dir)
                .files(&sources)
                .compile("frogger_game");
        }
        Err(_) => {
            println!("cargo:warning=FROGGER_GAME_SRC not set, expecting libfrogger_game on the link path");
            println!("cargo:rustc-link-lib=static=frogger_game");
        }
    }
}
