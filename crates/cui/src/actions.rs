use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::Back => app.go_back(),
        InputAction::Confirm => app.confirm(),
        InputAction::Flip => app.flip(),
        InputAction::Auto => app.auto(),
        InputAction::Interpret => app.request_interpretation(),
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::RotateLeft => app.rotate(false),
        InputAction::RotateRight => app.rotate(true),
        InputAction::ToggleDrawMode => app.toggle_draw_mode(),
        InputAction::CycleTone => app.cycle_tone(),
        InputAction::ToggleMeanings => app.toggle_meanings(),
        InputAction::ToggleHistory => app.toggle_history(),
        InputAction::NewReading => app.new_reading(),
    }
}
