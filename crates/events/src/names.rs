//! Display names of MIDI message kinds.
//!
//! Each table maps a code to `(stable id, descriptive name)`. Ids never depend
//! on the label style.

/// Channel voice messages by high status nibble
pub(crate) const fn channel_voice(nibble: u8) -> (&'static str, &'static str) {
    match nibble {
        0x8 => ("noteOff", "Note Off"),
        0x9 => ("noteOn", "Note On"),
        0xA => ("polyPressure", "Polyphonic Key Pressure"),
        0xB => ("controlChange", "Control Change"),
        0xC => ("programChange", "Program Change"),
        0xD => ("channelPressure", "Channel Pressure"),
        _ => ("pitchBend", "Pitch Bend"),
    }
}

/// Channel mode messages (controllers 120-127)
pub(crate) const fn channel_mode(controller: u8) -> (&'static str, &'static str) {
    match controller {
        120 => ("allSoundOff", "All Sound Off"),
        121 => ("resetAllControllers", "Reset All Controllers"),
        122 => ("localControl", "Local Control"),
        123 => ("allNotesOff", "All Notes Off"),
        124 => ("omniModeOff", "Omni Mode Off"),
        125 => ("omniModeOn", "Omni Mode On"),
        126 => ("monoModeOn", "Mono Mode On"),
        _ => ("polyModeOn", "Poly Mode On"),
    }
}

/// Well-known controller names; `None` for controllers without one
pub(crate) const fn controller(number: u8) -> Option<&'static str> {
    Some(match number {
        0 => "Bank Select",
        1 => "Modulation Wheel",
        2 => "Breath Controller",
        4 => "Foot Controller",
        5 => "Portamento Time",
        6 => "Data Entry",
        7 => "Channel Volume",
        8 => "Balance",
        10 => "Pan",
        11 => "Expression",
        32 => "Bank Select LSB",
        38 => "Data Entry LSB",
        64 => "Sustain Pedal",
        65 => "Portamento",
        66 => "Sostenuto",
        67 => "Soft Pedal",
        68 => "Legato Footswitch",
        71 => "Resonance",
        72 => "Release Time",
        73 => "Attack Time",
        74 => "Brightness",
        84 => "Portamento Control",
        91 => "Reverb Depth",
        92 => "Tremolo Depth",
        93 => "Chorus Depth",
        94 => "Celeste Depth",
        95 => "Phaser Depth",
        96 => "Data Increment",
        97 => "Data Decrement",
        98 => "NRPN LSB",
        99 => "NRPN MSB",
        100 => "RPN LSB",
        101 => "RPN MSB",
        _ => return None,
    })
}

/// System common and real-time messages; `None` for undefined status bytes
pub(crate) const fn system(status: u8) -> Option<(&'static str, &'static str)> {
    Some(match status {
        0xF0 => ("sysex", "System Exclusive"),
        0xF1 => ("mtcQuarterFrame", "MTC Quarter Frame"),
        0xF2 => ("songPosition", "Song Position Pointer"),
        0xF3 => ("songSelect", "Song Select"),
        0xF6 => ("tuneRequest", "Tune Request"),
        0xF7 => ("endOfExclusive", "End of Exclusive"),
        0xF8 => ("timingClock", "Timing Clock"),
        0xFA => ("start", "Start"),
        0xFB => ("continue", "Continue"),
        0xFC => ("stop", "Stop"),
        0xFE => ("activeSensing", "Active Sensing"),
        0xFF => ("reset", "System Reset"),
        _ => return None,
    })
}

/// Meta event types; `None` for unassigned types
pub(crate) const fn meta(kind: u8) -> Option<(&'static str, &'static str)> {
    Some(match kind {
        0x00 => ("sequenceNumber", "Sequence Number"),
        0x01 => ("text", "Text"),
        0x02 => ("copyright", "Copyright Notice"),
        0x03 => ("trackName", "Track Name"),
        0x04 => ("instrumentName", "Instrument Name"),
        0x05 => ("lyric", "Lyric"),
        0x06 => ("marker", "Marker"),
        0x07 => ("cuePoint", "Cue Point"),
        0x08 => ("programName", "Program Name"),
        0x09 => ("deviceName", "Device Name"),
        0x20 => ("channelPrefix", "Channel Prefix"),
        0x21 => ("port", "MIDI Port"),
        0x2F => ("endOfTrack", "End of Track"),
        0x51 => ("tempo", "Set Tempo"),
        0x54 => ("smpteOffset", "SMPTE Offset"),
        0x58 => ("timeSignature", "Time Signature"),
        0x59 => ("keySignature", "Key Signature"),
        0x7F => ("sequencerSpecific", "Sequencer Specific"),
        _ => return None,
    })
}
