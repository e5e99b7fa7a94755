use super::Vector2;

/// Axis-aligned rectangle in world space. `min` is the top-left corner; `y`
/// grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vector2,
    pub size: Vector2,
}

impl Aabb {
    pub fn new(min: Vector2, size: Vector2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vector2 {
        self.min + self.size
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }

    pub fn right(&self) -> f64 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f64 {
        self.min.y
    }

    pub fn bottom(&self) -> f64 {
        self.min.y + self.size.y
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Collision rectangle attached to an actor, offset from its position.
/// `area` is rebuilt every tick from the actor's pre-commit position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitBox {
    pub offset: Vector2,
    pub size: Vector2,
    pub area: Aabb,
}

impl HitBox {
    pub fn new(size: Vector2, offset: Vector2) -> Self {
        Self {
            offset,
            size,
            area: Aabb::new(offset, size),
        }
    }

    pub fn at(size: Vector2, offset: Vector2, pos: Vector2) -> Self {
        let mut hitbox = Self::new(size, offset);
        hitbox.refresh(pos);
        hitbox
    }

    pub fn refresh(&mut self, pos: Vector2) {
        self.area = Aabb::new(pos + self.offset, self.size);
    }
}
