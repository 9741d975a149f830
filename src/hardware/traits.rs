pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);

    fn set(&mut self, on: bool) {
        if on { self.on() } else { self.off() }
    }
}

// Called from the tick context: must not block.
pub trait Button {
    fn is_pressed(&mut self) -> bool;
}

impl<B: Button + ?Sized> Button for &mut B {
    fn is_pressed(&mut self) -> bool {
        (**self).is_pressed()
    }
}
