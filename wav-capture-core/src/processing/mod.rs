pub mod pcm_convert;
pub mod wav_format;
