use crate::hw::RelayState;

pub fn render_index(state: RelayState) -> String {
    let (colour, other, other_label) = match state {
        RelayState::On => ("#2e7d32", "/off", "Turn off"),
        RelayState::Off => ("#c62828", "/on", "Turn on"),
    };

    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Relay: {state}</title>
</head>
<body style="font-family: sans-serif; text-align: center">
<h1>Relay is <span style="color: {colour}">{state}</span></h1>
<p><a href="{other}">{other_label}</a></p>
</body>
</html>
"#
    )
}
