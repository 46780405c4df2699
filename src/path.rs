/// Generate SVG path command for a straight line
///
/// # Arguments
/// * `x1`, `y1` - Start point
/// * `x2`, `y2` - End point
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 L 60 20")
pub fn line_path(x1: f32, y1: f32, x2: f32, y2: f32) -> String {
    format!("M {} {} L {} {}", x1, y1, x2, y2)
}

/// Generate SVG path command for a dashed line
///
/// Emits one `M .. L ..` pair per dash. The last dash is cut at the end
/// point.
///
/// # Arguments
/// * `x1`, `y1` - Start point
/// * `x2`, `y2` - End point
/// * `dash` - Length of each drawn dash
/// * `gap` - Length of each gap between dashes
///
/// # Returns
/// SVG path command string; a solid line when `dash + gap` is not positive
pub fn dashed_line_path(x1: f32, y1: f32, x2: f32, y2: f32, dash: f32, gap: f32) -> String {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let length = (dx * dx + dy * dy).sqrt();
    let period = dash + gap;

    if period <= 0.0 || dash <= 0.0 || length <= dash {
        return line_path(x1, y1, x2, y2);
    }

    let (ux, uy) = (dx / length, dy / length);
    let mut commands = Vec::new();
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + dash).min(length);
        commands.push(format!(
            "M {} {} L {} {}",
            x1 + ux * offset,
            y1 + uy * offset,
            x1 + ux * end,
            y1 + uy * end
        ));
        offset += period;
    }
    commands.join(" ")
}

/// Generate SVG path command for a circle
///
/// Uses two half-circle arcs since a single SVG arc cannot close on itself.
///
/// # Arguments
/// * `cx`, `cy` - Center
/// * `radius` - Radius (absolute value is used)
pub fn circle_path(cx: f32, cy: f32, radius: f32) -> String {
    let r = radius.abs();
    format!(
        "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
        cx - r,
        cy,
        r,
        r,
        cx + r,
        cy,
        r,
        r,
        cx - r,
        cy
    )
}

/// Generate SVG path command for a closed polygon
///
/// Returns an empty string for fewer than two points.
pub fn polygon_path(points: &[(f32, f32)]) -> String {
    let Some(((x0, y0), rest)) = points.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut path = format!("M {} {}", x0, y0);
    for (x, y) in rest {
        path.push_str(&format!(" L {} {}", x, y));
    }
    path.push_str(" Z");
    path
}

/// Generate SVG path command for an axis-aligned rectangle
pub fn rect_path(x: f32, y: f32, width: f32, height: f32) -> String {
    polygon_path(&[(x, y), (x + width, y), (x + width, y + height), (x, y + height)])
}
