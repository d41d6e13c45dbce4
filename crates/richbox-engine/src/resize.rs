/// Pointer position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Limits applied while dragging the resize handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeBounds {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    /// Stacking order of the container while a drag is in progress
    pub raised_z_index: i32,
}

impl Default for ResizeBounds {
    fn default() -> Self {
        Self {
            min_width: 119.0,
            max_width: 1200.0,
            min_height: 22.0,
            raised_z_index: 1000,
        }
    }
}

impl ResizeBounds {
    fn apply(&self, width: f64, height: f64) -> Size {
        Size {
            width: width.max(self.min_width).min(self.max_width),
            height: height.max(self.min_height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeSession {
    start: Point,
    start_size: Size,
}

/// Drag-to-resize state machine for the editor container.
///
/// Idle until [`Self::on_drag_start`]; every move computes the new size from
/// the pointer delta against the drag start, not the previous move, so the
/// size never drifts.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    bounds: ResizeBounds,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(bounds: ResizeBounds) -> Self {
        Self {
            bounds,
            session: None,
        }
    }

    pub fn bounds(&self) -> &ResizeBounds {
        &self.bounds
    }

    pub fn on_drag_start(&mut self, pointer: Point, current_size: Size) {
        self.session = Some(ResizeSession {
            start: pointer,
            start_size: current_size,
        });
    }

    /// New container size for the pointer position, or `None` when idle.
    pub fn on_drag_move(&mut self, pointer: Point) -> Option<Size> {
        let session = self.session?;
        let dx = pointer.x - session.start.x;
        let dy = pointer.y - session.start.y;
        Some(self.bounds.apply(
            session.start_size.width + dx,
            session.start_size.height + dy,
        ))
    }

    pub fn on_drag_end(&mut self) {
        self.session = None;
    }

    /// Abandon the drag, e.g. when the window loses focus before the
    /// pointer is released. Returns the size to go back to.
    pub fn cancel(&mut self) -> Option<Size> {
        self.session.take().map(|session| session.start_size)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Stacking order to apply to the container, while a drag is active.
    pub fn z_index(&self) -> Option<i32> {
        self.is_active().then_some(self.bounds.raised_z_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dragging_from_origin(size: Size) -> ResizeController {
        let mut controller = ResizeController::default();
        controller.on_drag_start(Point::new(0.0, 0.0), size);
        controller
    }

    #[test]
    fn test_drag_is_clamped_to_max_width() {
        let mut controller = dragging_from_origin(Size::new(400.0, 200.0));

        let size = controller.on_drag_move(Point::new(2000.0, 50.0));

        assert_eq!(size, Some(Size::new(1200.0, 250.0)));
    }

    #[rstest]
    #[case(-1000.0, -1000.0, 119.0, 22.0)]
    #[case(-281.0, -178.0, 119.0, 22.0)]
    #[case(-280.0, -177.0, 120.0, 23.0)]
    #[case(800.0, 0.0, 1200.0, 200.0)]
    #[case(0.0, 5000.0, 400.0, 5200.0)]
    #[case(12.5, 7.5, 412.5, 207.5)]
    fn test_drag_respects_bounds(
        #[case] dx: f64,
        #[case] dy: f64,
        #[case] width: f64,
        #[case] height: f64,
    ) {
        let mut controller = dragging_from_origin(Size::new(400.0, 200.0));

        let size = controller.on_drag_move(Point::new(dx, dy)).unwrap();

        assert_eq!(size, Size::new(width, height));
    }

    #[test]
    fn test_moves_are_measured_from_drag_start() {
        let mut controller = ResizeController::default();
        controller.on_drag_start(Point::new(100.0, 100.0), Size::new(400.0, 200.0));

        controller.on_drag_move(Point::new(150.0, 120.0));
        let size = controller.on_drag_move(Point::new(110.0, 90.0));

        assert_eq!(size, Some(Size::new(410.0, 190.0)));
    }

    #[test]
    fn test_idle_controller_ignores_moves() {
        let mut controller = ResizeController::default();

        assert_eq!(controller.on_drag_move(Point::new(10.0, 10.0)), None);
        assert_eq!(controller.z_index(), None);
    }

    #[test]
    fn test_drag_end_stops_tracking() {
        let mut controller = dragging_from_origin(Size::new(400.0, 200.0));
        assert_eq!(controller.z_index(), Some(1000));

        controller.on_drag_end();

        assert!(!controller.is_active());
        assert_eq!(controller.on_drag_move(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_cancel_returns_start_size() {
        let mut controller = dragging_from_origin(Size::new(400.0, 200.0));
        controller.on_drag_move(Point::new(300.0, 300.0));

        assert_eq!(controller.cancel(), Some(Size::new(400.0, 200.0)));
        assert_eq!(controller.cancel(), None);
    }

    #[test]
    fn test_custom_bounds() {
        let mut controller = ResizeController::new(ResizeBounds {
            min_width: 50.0,
            max_width: 300.0,
            min_height: 10.0,
            raised_z_index: 5,
        });
        controller.on_drag_start(Point::new(0.0, 0.0), Size::new(100.0, 100.0));

        assert_eq!(controller.z_index(), Some(5));
        assert_eq!(
            controller.on_drag_move(Point::new(-500.0, -500.0)),
            Some(Size::new(50.0, 10.0))
        );
    }
}
