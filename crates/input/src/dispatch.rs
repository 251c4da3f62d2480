use glaze_common::AnimationFlags;

/// Keys with a bound action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Toggle the idle object animation (bound to Space).
    ToggleObjects,
    /// Show or hide the performance readout (bound to the 0 key).
    ToggleStats,
}

/// A window event translated into dispatch vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was resized.
    Resized,
    /// The display scale changed (monitor change, rotation).
    ScaleFactorChanged,
    PointerDown,
    PointerMoved { over_surface: bool },
    PointerReleased { over_surface: bool },
    PointerLeft,
    Key(KeyCommand),
}

/// Cursor affordance over the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Grab,
    Grabbing,
}

/// An instruction for the application to carry out after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Recompute the viewport, resize the surface, reframe the camera.
    Reproject,
    /// The loop was paused and must be re-armed (schedule a frame).
    Resume,
    SetCursor(CursorMode),
    ToggleStats,
}

/// Apply one input event to the animation flags, returning the effects the
/// application must perform.
///
/// Gesture semantics: a press-and-release without movement toggles the idle
/// animation; any movement while pressed is a drag, which never toggles but
/// shows the grabbing cursor and re-arms a paused loop.
pub fn dispatch(flags: &mut AnimationFlags, event: InputEvent) -> Vec<Effect> {
    match event {
        InputEvent::Resized | InputEvent::ScaleFactorChanged => vec![Effect::Reproject],

        InputEvent::PointerDown => {
            flags.pointer_down = true;
            Vec::new()
        }

        InputEvent::PointerMoved { over_surface } => {
            flags.dragging = flags.pointer_down;
            if !over_surface {
                return Vec::new();
            }
            if flags.dragging {
                let mut effects = vec![Effect::SetCursor(CursorMode::Grabbing)];
                if !flags.running {
                    flags.running = true;
                    effects.push(Effect::Resume);
                    tracing::debug!("drag resumed the paused loop");
                }
                effects
            } else {
                vec![Effect::SetCursor(CursorMode::Grab)]
            }
        }

        InputEvent::PointerReleased { over_surface } => release(flags, over_surface),
        InputEvent::PointerLeft => release(flags, false),

        InputEvent::Key(KeyCommand::ToggleObjects) => {
            flags.objects_animating = !flags.objects_animating;
            Vec::new()
        }
        InputEvent::Key(KeyCommand::ToggleStats) => vec![Effect::ToggleStats],
    }
}

fn release(flags: &mut AnimationFlags, over_surface: bool) -> Vec<Effect> {
    if !flags.dragging && over_surface {
        flags.objects_animating = !flags.objects_animating;
    }
    flags.dragging = false;
    flags.pointer_down = false;
    vec![Effect::SetCursor(CursorMode::Grab)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_on_surface_toggles_object_animation() {
        let mut flags = AnimationFlags::default();
        dispatch(&mut flags, InputEvent::PointerDown);
        dispatch(&mut flags, InputEvent::PointerReleased { over_surface: true });
        assert!(!flags.objects_animating);
        assert!(!flags.pointer_down);

        dispatch(&mut flags, InputEvent::PointerDown);
        dispatch(&mut flags, InputEvent::PointerReleased { over_surface: true });
        assert!(flags.objects_animating);
    }

    #[test]
    fn release_off_surface_does_not_toggle() {
        let mut flags = AnimationFlags::default();
        dispatch(&mut flags, InputEvent::PointerDown);
        dispatch(
            &mut flags,
            InputEvent::PointerReleased {
                over_surface: false,
            },
        );
        assert!(flags.objects_animating);
    }

    #[test]
    fn drag_never_toggles() {
        let mut flags = AnimationFlags::default();
        dispatch(&mut flags, InputEvent::PointerDown);
        let effects = dispatch(&mut flags, InputEvent::PointerMoved { over_surface: true });
        assert!(flags.dragging);
        assert_eq!(effects, vec![Effect::SetCursor(CursorMode::Grabbing)]);

        let effects = dispatch(&mut flags, InputEvent::PointerReleased { over_surface: true });
        assert!(flags.objects_animating);
        assert!(!flags.dragging);
        assert_eq!(effects, vec![Effect::SetCursor(CursorMode::Grab)]);
    }

    #[test]
    fn drag_resumes_paused_loop_once() {
        let mut flags = AnimationFlags {
            running: false,
            ..Default::default()
        };
        dispatch(&mut flags, InputEvent::PointerDown);
        let effects = dispatch(&mut flags, InputEvent::PointerMoved { over_surface: true });
        assert!(flags.running);
        assert!(effects.contains(&Effect::Resume));

        // Already running: no second resume.
        let effects = dispatch(&mut flags, InputEvent::PointerMoved { over_surface: true });
        assert!(!effects.contains(&Effect::Resume));
    }

    #[test]
    fn hover_without_press_shows_grab_cursor() {
        let mut flags = AnimationFlags::default();
        let effects = dispatch(&mut flags, InputEvent::PointerMoved { over_surface: true });
        assert!(!flags.dragging);
        assert_eq!(effects, vec![Effect::SetCursor(CursorMode::Grab)]);
    }

    #[test]
    fn move_off_surface_emits_nothing() {
        let mut flags = AnimationFlags::default();
        let effects = dispatch(
            &mut flags,
            InputEvent::PointerMoved {
                over_surface: false,
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn pointer_leave_clears_gesture_without_toggling() {
        let mut flags = AnimationFlags::default();
        dispatch(&mut flags, InputEvent::PointerDown);
        dispatch(&mut flags, InputEvent::PointerLeft);
        assert!(flags.objects_animating);
        assert!(!flags.pointer_down);
        assert!(!flags.dragging);
    }

    #[test]
    fn resize_and_scale_change_both_reproject() {
        let mut flags = AnimationFlags::default();
        assert_eq!(
            dispatch(&mut flags, InputEvent::Resized),
            vec![Effect::Reproject]
        );
        assert_eq!(
            dispatch(&mut flags, InputEvent::ScaleFactorChanged),
            vec![Effect::Reproject]
        );
    }

    #[test]
    fn key_bindings() {
        let mut flags = AnimationFlags::default();
        dispatch(&mut flags, InputEvent::Key(KeyCommand::ToggleObjects));
        assert!(!flags.objects_animating);
        dispatch(&mut flags, InputEvent::Key(KeyCommand::ToggleObjects));
        assert!(flags.objects_animating);

        let effects = dispatch(&mut flags, InputEvent::Key(KeyCommand::ToggleStats));
        assert_eq!(effects, vec![Effect::ToggleStats]);
    }
}
