use serde::ser::{Serialize, SerializeSeq, Serializer};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    GetProperties(&'static [&'static str]),
    SetBhMode(&'static str),
    SetGearsIdx(u8),
    SetPower(bool),
    SetBright(u8),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetProperties(_) => "get_prop",
            Command::SetBhMode(_) => "set_bh_mode",
            Command::SetGearsIdx(_) => "set_gears_idx",
            Command::SetPower(_) => "set_power",
            Command::SetBright(_) => "set_bright",
        }
    }
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Command::GetProperties(properties) => {
                let mut seq = serializer.serialize_seq(Some(properties.len()))?;

                for property in properties.iter() {
                    seq.serialize_element(property)?;
                }

                seq.end()
            }
            Command::SetBhMode(code) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(code)?;
                seq.end()
            }
            Command::SetGearsIdx(index) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(index)?;
                seq.end()
            }
            Command::SetPower(is_on) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(if *is_on { "on" } else { "off" })?;
                seq.end()
            }
            Command::SetBright(percent) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(percent)?;
                seq.end()
            }
        }
    }
}
