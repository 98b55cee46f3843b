//! Channel voice events stamped with the sample frame they occurred at.

use midi_msg::{Channel, ChannelVoiceMsg, ControlChange, MidiMsg};

/// MIDI event with an absolute frame position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Frames elapsed since the stream started.
    pub frame: u64,
    pub channel: Channel,
    pub msg: ChannelVoiceMsg,
}

impl MidiEvent {
    #[inline]
    pub fn new(frame: u64, channel: Channel, msg: ChannelVoiceMsg) -> Self {
        Self {
            frame,
            channel,
            msg,
        }
    }

    #[inline]
    pub fn note_on(frame: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            frame,
            Channel::from_u8(channel),
            ChannelVoiceMsg::NoteOn { note, velocity },
        )
    }

    #[inline]
    pub fn note_off(frame: u64, channel: u8, note: u8) -> Self {
        Self::new(
            frame,
            Channel::from_u8(channel),
            ChannelVoiceMsg::NoteOff { note, velocity: 0 },
        )
    }

    #[inline]
    pub fn bank_select(frame: u64, channel: u8, bank: u16) -> Self {
        Self::new(
            frame,
            Channel::from_u8(channel),
            ChannelVoiceMsg::ControlChange {
                control: ControlChange::BankSelect(bank),
            },
        )
    }

    #[inline]
    pub fn program_change(frame: u64, channel: u8, program: u8) -> Self {
        Self::new(
            frame,
            Channel::from_u8(channel),
            ChannelVoiceMsg::ProgramChange { program },
        )
    }

    #[inline]
    pub fn channel_num(&self) -> u8 {
        self.channel as u8
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOn { velocity, .. } if velocity > 0)
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self.msg,
            ChannelVoiceMsg::NoteOff { .. } | ChannelVoiceMsg::NoteOn { velocity: 0, .. }
        )
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. } | ChannelVoiceMsg::NoteOff { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn program(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::ProgramChange { program } => Some(program),
            _ => None,
        }
    }

    #[inline]
    pub fn to_midi_msg(&self) -> MidiMsg {
        MidiMsg::ChannelVoice {
            channel: self.channel,
            msg: self.msg,
        }
    }

    /// Wire bytes, for logging or forwarding to a hardware port.
    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_midi_msg().to_midi()
    }
}
