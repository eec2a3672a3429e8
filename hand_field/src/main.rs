//! hand_field — interactive entry point.

use hand_field::app;

fn main() {
    env_logger::init();

    println!();
    println!("╔════════════════════════════════════════════════════╗");
    println!("║    Hand Field — Depth-Driven Polygon Visualizer    ║");
    println!("╚════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    {
        println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
        println!();
        println!("  H          raise / hide the hand");
        println!("  Up / Down  move the hand closer / farther");
        println!("  Q          quit");
    }
    println!();
    println!("  Raise your hand to start the field; approach to add vertices.");
    println!();

    if let Err(e) = app::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
